//! Request and response bodies of the Gemini REST API (`v1beta`).

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<RawModel>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModel {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub input_token_limit: Option<u64>,
    pub output_token_limit: Option<u64>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Borrows the prompt and the encoded video, so the base64 payload is never copied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub generation_config: GenerationConfig,
    pub safety_settings: &'a [SafetySetting],
}

#[derive(Debug, Clone, Serialize)]
pub struct Content<'a> {
    pub role: &'a str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData<'a> {
    pub data: &'a str,
    pub mime_type: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Result<String, ProviderError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(ProviderError::Blocked {
                reason: format!("prompt blocked ({reason})"),
            });
        }

        let Some(candidate) = self.candidates.first() else {
            return Err(ProviderError::InvalidResponse {
                reason: "response contained no candidates".to_string(),
            });
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .clone()
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(ProviderError::Blocked {
                reason: format!("candidate has no text (finish reason {reason})"),
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_all_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "{\"summary\":"}, {"text": " \"ok\"}"}]},
                     "finishReason": "STOP"},
                    {"content": {"parts": [{"text": "ignored"}]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(response.text().unwrap(), r#"{"summary": "ok"}"#);
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        let err = response.text().unwrap_err();
        assert!(matches!(err, ProviderError::Blocked { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn empty_candidate_reports_finish_reason() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "RECITATION"}]}"#).unwrap();
        let err = response.text().unwrap_err();
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    fn parts_serialize_as_text_and_inline_data() {
        let content = Content {
            role: "user",
            parts: vec![
                Part::Text { text: "describe" },
                Part::InlineData {
                    inline_data: InlineData {
                        data: "AAAA",
                        mime_type: "video/mp4",
                    },
                },
            ],
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["parts"][0]["text"], "describe");
        assert_eq!(json["parts"][1]["inlineData"]["data"], "AAAA");
        assert_eq!(json["parts"][1]["inlineData"]["mimeType"], "video/mp4");
    }

    #[test]
    fn list_models_tolerates_missing_optional_fields() {
        let response: ListModelsResponse =
            serde_json::from_str(r#"{"models": [{"name": "models/gemini-pro"}]}"#).unwrap();
        let model = &response.models[0];
        assert!(model.display_name.is_none());
        assert!(model.supported_generation_methods.is_empty());
        assert!(response.next_page_token.is_none());
    }
}
