use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::ProviderError,
    provider::{Credential, ProviderConfig},
    wire::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, ListModelsResponse},
};

/// The two provider calls the pipeline needs.
#[async_trait]
pub trait GenerativeApi: Send + Sync {
    async fn list_models(
        &self,
        credential: &Credential,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, ProviderError>;

    async fn generate_content(
        &self,
        credential: &Credential,
        model_name: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, ProviderError>;
}

#[async_trait]
impl<T: GenerativeApi + ?Sized> GenerativeApi for &T {
    async fn list_models(
        &self,
        credential: &Credential,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, ProviderError> {
        (**self).list_models(credential, page_size, page_token).await
    }

    async fn generate_content(
        &self,
        credential: &Credential,
        model_name: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, ProviderError> {
        (**self).generate_content(credential, model_name, request).await
    }
}

/// `GenerativeApi` over the Gemini REST endpoints.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn model_url(&self, model_name: &str) -> String {
        let model = if model_name.starts_with("models/") {
            model_name.to_string()
        } else {
            format!("models/{}", model_name)
        };
        format!("{}/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl GenerativeApi for GeminiClient {
    async fn list_models(
        &self,
        credential: &Credential,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, ProviderError> {
        let mut query: Vec<(&str, String)> = vec![("key", credential.expose().to_string())];
        if let Some(size) = page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        debug!(?page_size, has_page_token = page_token.is_some(), "listing models");
        let response = self
            .http
            .get(format!("{}/models", self.api_base))
            .query(&query)
            .send()
            .await
            .map_err(redact)?;

        decode(response).await
    }

    async fn generate_content(
        &self,
        credential: &Credential,
        model_name: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, ProviderError> {
        debug!(model = model_name, "sending generateContent request");
        let response = self
            .http
            .post(self.model_url(model_name))
            .query(&[("key", credential.expose())])
            .json(request)
            .send()
            .await
            .map_err(redact)?;

        decode(response).await
    }
}

// The key travels in the query string, so URLs must not reach error messages.
fn redact(err: reqwest::Error) -> ProviderError {
    ProviderError::Http(err.without_url())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await.map_err(redact)?;

    if !status.is_success() {
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
        reason: e.to_string(),
    })
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        let message = envelope.error.message;
        return match envelope.error.status {
            Some(code) if !message.is_empty() => format!("{} ({})", message, code),
            Some(code) => code,
            None => message,
        };
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
