use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::process::Command;

/// Start-offset flags for the players we know; anything else gets mpv-style `--start`.
fn start_args(player: &str, seconds: u64) -> Vec<String> {
    let name = Path::new(player)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match name.as_str() {
        "vlc" | "cvlc" => vec![format!("--start-time={}", seconds)],
        "ffplay" => vec!["-ss".to_string(), seconds.to_string()],
        "iina" => vec![format!("--mpv-start={}", seconds)],
        _ => vec![format!("--start={}", seconds)],
    }
}

/// Open `video` in an external player positioned at `seconds` and wait for it to exit.
pub async fn seek(player: &str, video: &Path, seconds: u64) -> Result<()> {
    let status = Command::new(player)
        .args(start_args(player, seconds))
        .arg(video)
        .status()
        .await
        .with_context(|| format!("failed to launch player {}", player))?;

    if !status.success() {
        bail!("{} exited with {}", player, status);
    }
    Ok(())
}
