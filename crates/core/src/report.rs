use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{error::Result, pipeline::AnalysisStatus, types::VideoAnalysis};

/// Saved form of one finished analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub model: String,
    pub video: String,
    pub degraded: bool,
    pub analysis: VideoAnalysis,
}

impl AnalysisReport {
    pub fn new(model: &str, video_path: &Path, status: AnalysisStatus, analysis: VideoAnalysis) -> Self {
        Self {
            model: model.to_string(),
            video: video_path.display().to_string(),
            degraded: status == AnalysisStatus::Degraded,
            analysis,
        }
    }
}

pub fn get_reports_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("reelsight")
        .join("reports")
}

/// `<reports_dir>/<video stem>_<model id>.json`
pub fn get_report_path(reports_dir: &Path, video_path: &Path, model_name: &str) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    let model = model_name.rsplit('/').next().unwrap_or(model_name);
    reports_dir.join(format!("{}_{}.json", stem, model))
}

/// Save a report, creating parent directories as needed
pub async fn save_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let pretty_json = serde_json::to_string_pretty(report)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

pub async fn load_report(path: &Path) -> Result<AnalysisReport> {
    let json_content = fs::read_to_string(path).await?;
    let report: AnalysisReport = serde_json::from_str(&json_content)?;
    Ok(report)
}
