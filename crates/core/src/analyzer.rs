use tracing::{debug, error, info};

use crate::{
    client::GenerativeApi,
    error::ProviderError,
    prompt::{GenerationSettings, build_request, resolve_prompt},
    provider::Credential,
    types::AnalysisRequest,
};

/// Submit one generation request and return the raw reply text. No retries.
pub async fn request_analysis<A: GenerativeApi + ?Sized>(
    api: &A,
    credential: &Credential,
    request: &AnalysisRequest,
    settings: &GenerationSettings,
) -> Result<String, ProviderError> {
    let prompt = resolve_prompt(request.prompt.as_deref());
    debug!(
        model = %request.model_name,
        custom_prompt = request.prompt.as_deref().is_some_and(|p| !p.trim().is_empty()),
        payload_len = request.video.data.len(),
        "composing analysis request"
    );

    let body = build_request(prompt, &request.video, settings);
    let response = api
        .generate_content(credential, &request.model_name, &body)
        .await
        .inspect_err(|e| error!(error = %e, model = %request.model_name, "analysis request failed"))?;

    let text = response.text()?;
    info!(model = %request.model_name, chars = text.len(), "received analysis reply");
    Ok(text)
}
