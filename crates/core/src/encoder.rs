use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tokio::fs;
use tracing::debug;

use crate::{error::Result, types::EncodedVideo};

/// Read the whole file and base64-encode it.
pub async fn encode_video(path: &Path, mime_type: &str) -> Result<EncodedVideo> {
    let bytes = fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), mime_type, "encoding video");
    Ok(encode_bytes(&bytes, mime_type))
}

pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> EncodedVideo {
    EncodedVideo {
        data: BASE64.encode(bytes),
        mime_type: mime_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ReelsightError;

    #[tokio::test]
    async fn encodes_whole_file_with_declared_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x00\x00\x00\x18ftypmp42").unwrap();

        let encoded = encode_video(file.path(), "video/mp4").await.unwrap();

        assert_eq!(encoded.mime_type, "video/mp4");
        assert_eq!(encoded.data, "AAAAGGZ0eXBtcDQy");
        assert_eq!(BASE64.decode(&encoded.data).unwrap(), b"\x00\x00\x00\x18ftypmp42");
    }

    #[tokio::test]
    async fn missing_file_fails_outright() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_video(&dir.path().join("absent.mp4"), "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, ReelsightError::IoError(_)));
    }

    #[test]
    fn empty_input_encodes_to_empty_string() {
        assert_eq!(encode_bytes(&[], "video/webm").data, "");
    }
}
