use std::path::Path;

use tracing::{info, warn};

use crate::{
    analyzer::request_analysis,
    client::GenerativeApi,
    encoder::encode_video,
    error::Result,
    normalize::normalize_response,
    prompt::GenerationSettings,
    provider::Credential,
    types::{AnalysisRequest, VideoAnalysis},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Encoding,
    Requesting,
    Normalizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Succeeded,
    /// The reply was not structured JSON; the analysis carries the raw text as its summary.
    Degraded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: VideoAnalysis,
    pub status: AnalysisStatus,
}

/// Everything the pipeline needs for one analysis besides the provider.
#[derive(Debug, Clone, Copy)]
pub struct VideoJob<'a> {
    pub model_name: &'a str,
    pub video_path: &'a Path,
    pub mime_type: &'a str,
    pub prompt: Option<&'a str>,
}

/// Encode, request and normalize one video.
///
/// `on_stage` is called when each stage starts. Only a provider or IO failure returns `Err`;
/// an unparseable reply yields `AnalysisStatus::Degraded`.
pub async fn analyze_video<A, F>(
    api: &A,
    credential: &Credential,
    job: VideoJob<'_>,
    settings: &GenerationSettings,
    mut on_stage: F,
) -> Result<AnalysisOutcome>
where
    A: GenerativeApi + ?Sized,
    F: FnMut(AnalysisStage),
{
    on_stage(AnalysisStage::Encoding);
    let video = encode_video(job.video_path, job.mime_type).await?;

    on_stage(AnalysisStage::Requesting);
    let request = AnalysisRequest {
        model_name: job.model_name.to_string(),
        video,
        prompt: job.prompt.map(str::to_string),
    };
    let text = request_analysis(api, credential, &request, settings).await?;
    drop(request);

    on_stage(AnalysisStage::Normalizing);
    let normalized = normalize_response(&text);
    let status = if normalized.degraded {
        warn!("analysis degraded to raw text");
        AnalysisStatus::Degraded
    } else {
        AnalysisStatus::Succeeded
    };
    info!(
        ?status,
        timestamps = normalized.analysis.timestamps.len(),
        sections = normalized.analysis.detailed_analysis.len(),
        "analysis finished"
    );

    Ok(AnalysisOutcome {
        analysis: normalized.analysis,
        status,
    })
}
