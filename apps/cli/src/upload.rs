use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

/// 100 MB ceiling on uploaded videos.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please upload a video file ({mime_type} is not a video type).")]
    NotVideo { mime_type: String },

    #[error("File size exceeds 100MB limit ({size} bytes).")]
    TooLarge { size: u64 },

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

pub fn check_media(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if !mime_type.starts_with("video/") {
        return Err(UploadError::NotVideo {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }
    Ok(())
}

/// Resolve the media type (explicit, else guessed from the extension) and check the file.
pub async fn inspect_upload(path: &Path, mime_override: Option<&str>) -> Result<Upload, UploadError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|source| UploadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let mime_type = match mime_override {
        Some(mime) => mime.trim().to_string(),
        None => mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    check_media(&mime_type, metadata.len())?;

    Ok(Upload {
        path: path.to_path_buf(),
        mime_type,
        size: metadata.len(),
    })
}
