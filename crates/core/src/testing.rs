use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{
    client::GenerativeApi,
    error::ProviderError,
    provider::Credential,
    wire::{
        Candidate, CandidateContent, GenerateContentRequest, GenerateContentResponse,
        ListModelsResponse, RawModel, ResponsePart,
    },
};

/// Scripted provider that records every call.
#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<VecDeque<ListModelsResponse>>,
    reply: Option<String>,
    fail_listing: bool,
    fail_generation: bool,
    pub list_calls: Mutex<Vec<(Option<u32>, Option<String>)>>,
    /// Model name and the request body as it would go over the wire.
    pub generate_calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, models: Vec<RawModel>, next_page_token: Option<&str>) -> Self {
        self.pages.lock().unwrap().push_back(ListModelsResponse {
            models,
            next_page_token: next_page_token.map(str::to_string),
        });
        self
    }

    pub fn with_reply(mut self, text: &str) -> Self {
        self.reply = Some(text.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn generate_call_count(&self) -> usize {
        self.generate_calls.lock().unwrap().len()
    }
}

pub fn raw_model(name: &str, methods: &[&str]) -> RawModel {
    RawModel {
        name: name.to_string(),
        supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        ..RawModel::default()
    }
}

pub fn credential() -> Credential {
    Credential::new("test-key").unwrap()
}

#[async_trait]
impl GenerativeApi for FakeApi {
    async fn list_models(
        &self,
        _credential: &Credential,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, ProviderError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((page_size, page_token.map(str::to_string)));
        if self.fail_listing {
            return Err(ProviderError::Api {
                status: 400,
                message: "API key not valid.".to_string(),
            });
        }
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn generate_content(
        &self,
        _credential: &Credential,
        model_name: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let body = serde_json::to_value(request).unwrap();
        self.generate_calls
            .lock()
            .unwrap()
            .push((model_name.to_string(), body));
        if self.fail_generation {
            return Err(ProviderError::Api {
                status: 503,
                message: "connection reset".to_string(),
            });
        }
        let text = self.reply.clone().unwrap_or_default();
        Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ResponsePart { text: Some(text) }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        })
    }
}
