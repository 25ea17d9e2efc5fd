use std::collections::HashSet;

use tracing::{info, warn};

use crate::{
    client::GenerativeApi,
    error::ProviderError,
    provider::{Credential, ProviderConfig},
    types::ModelDescriptor,
    wire::RawModel,
};

pub const CONTENT_GENERATION_METHOD: &str = "generateContent";

/// True iff a single listing call succeeds. Errors are logged, never returned.
pub async fn validate_api_key<A: GenerativeApi + ?Sized>(api: &A, credential: &Credential) -> bool {
    match api.list_models(credential, Some(1), None).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "API key validation failed");
            false
        }
    }
}

/// Fetch every page of the model list and keep the multimodal models of the configured family.
pub async fn fetch_models<A: GenerativeApi + ?Sized>(
    api: &A,
    credential: &Credential,
    config: &ProviderConfig,
) -> Result<Vec<ModelDescriptor>, ProviderError> {
    let mut raw = Vec::new();
    let mut page_token: Option<String> = None;
    let mut seen_tokens = HashSet::new();

    loop {
        let page = api
            .list_models(credential, None, page_token.as_deref())
            .await?;
        raw.extend(page.models);

        match page.next_page_token {
            Some(token) if !token.is_empty() => {
                if !seen_tokens.insert(token.clone()) {
                    warn!(token = %token, "model listing repeated a page token, stopping");
                    break;
                }
                page_token = Some(token);
            }
            _ => break,
        }
    }

    let total = raw.len();
    let models = filter_models(raw, config.model_family);
    info!(total, usable = models.len(), "fetched model catalog");
    Ok(models)
}

/// Provider order is preserved.
pub fn filter_models(raw: Vec<RawModel>, model_family: &str) -> Vec<ModelDescriptor> {
    raw.into_iter()
        .filter(|model| {
            model
                .supported_generation_methods
                .iter()
                .any(|method| method == CONTENT_GENERATION_METHOD)
                && model.name.contains(model_family)
        })
        .map(to_descriptor)
        .collect()
}

fn to_descriptor(model: RawModel) -> ModelDescriptor {
    let display_name = match model.display_name {
        Some(name) if !name.is_empty() => name,
        _ => model
            .name
            .rsplit('/')
            .next()
            .unwrap_or(&model.name)
            .to_string(),
    };

    ModelDescriptor {
        display_name,
        description: model.description.unwrap_or_default(),
        input_token_limit: model.input_token_limit.unwrap_or(0),
        output_token_limit: model.output_token_limit.unwrap_or(0),
        supported_generation_methods: model.supported_generation_methods,
        name: model.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, credential, raw_model};

    #[test]
    fn excludes_models_without_content_generation() {
        let raw = vec![
            raw_model("models/gemini-embedding-001", &["embedContent"]),
            raw_model("models/gemini-1.5-pro", &["generateContent", "countTokens"]),
        ];
        let models = filter_models(raw, "gemini");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "models/gemini-1.5-pro");
    }

    #[test]
    fn excludes_models_outside_the_family() {
        let raw = vec![raw_model("models/text-bison-001", &["generateContent"])];
        assert!(filter_models(raw, "gemini").is_empty());
    }

    #[test]
    fn substitutes_defaults_for_absent_fields() {
        let raw = vec![raw_model("models/gemini-1.5-flash", &["generateContent"])];
        let model = &filter_models(raw, "gemini")[0];
        assert_eq!(model.display_name, "gemini-1.5-flash");
        assert_eq!(model.description, "");
        assert_eq!(model.input_token_limit, 0);
        assert_eq!(model.output_token_limit, 0);
        assert_eq!(model.supported_generation_methods, vec!["generateContent"]);
    }

    #[test]
    fn keeps_provided_fields_and_order() {
        let mut pro = raw_model("models/gemini-1.5-pro", &["generateContent"]);
        pro.display_name = Some("Gemini 1.5 Pro".into());
        pro.description = Some("Mid-size multimodal model".into());
        pro.input_token_limit = Some(2_000_000);
        pro.output_token_limit = Some(8192);
        let mut empty_name = raw_model("models/gemini-2.0-flash", &["generateContent"]);
        empty_name.display_name = Some(String::new());

        let models = filter_models(vec![pro, empty_name], "gemini");
        assert_eq!(models[0].display_name, "Gemini 1.5 Pro");
        assert_eq!(models[0].description, "Mid-size multimodal model");
        assert_eq!(models[0].input_token_limit, 2_000_000);
        assert_eq!(models[0].output_token_limit, 8192);
        assert_eq!(models[1].display_name, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn validation_uses_a_single_small_listing() {
        let api = FakeApi::new();
        assert!(validate_api_key(&api, &credential()).await);
        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(Some(1), None)]);
    }

    #[tokio::test]
    async fn validation_failure_returns_false() {
        let api = FakeApi::new().failing_listing();
        assert!(!validate_api_key(&api, &credential()).await);
    }

    #[tokio::test]
    async fn fetch_follows_page_tokens() {
        let api = FakeApi::new()
            .with_page(
                vec![raw_model("models/gemini-1.5-pro", &["generateContent"])],
                Some("page-2"),
            )
            .with_page(
                vec![raw_model("models/gemini-2.0-flash", &["generateContent"])],
                None,
            );

        let models = fetch_models(&api, &credential(), &ProviderConfig::default())
            .await
            .unwrap();

        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["models/gemini-1.5-pro", "models/gemini-2.0-flash"]);
        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(calls[1], (None, Some("page-2".to_string())));
    }

    #[tokio::test]
    async fn fetch_stops_when_page_tokens_cycle() {
        let api = FakeApi::new()
            .with_page(vec![raw_model("models/gemini-a", &["generateContent"])], Some("A"))
            .with_page(vec![raw_model("models/gemini-b", &["generateContent"])], Some("B"))
            .with_page(vec![raw_model("models/gemini-c", &["generateContent"])], Some("A"))
            .with_page(vec![raw_model("models/gemini-d", &["generateContent"])], None);

        let models = fetch_models(&api, &credential(), &ProviderConfig::default())
            .await
            .unwrap();

        assert_eq!(models.len(), 3);
        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (None, None),
                (None, Some("A".to_string())),
                (None, Some("B".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_propagates_listing_failure() {
        let api = FakeApi::new().failing_listing();
        let err = fetch_models(&api, &credential(), &ProviderConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
    }
}
