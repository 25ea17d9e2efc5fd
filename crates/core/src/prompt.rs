use crate::{
    types::EncodedVideo,
    wire::{
        Content, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
        InlineData, Part, SafetySetting,
    },
};

pub static DEFAULT_ANALYSIS_PROMPT: &str = r#"Analyze this video and provide a comprehensive analysis. Format your response as JSON with the following structure:
{
  "summary": "A concise summary of the entire video",
  "keyPoints": ["Key point 1", "Key point 2", ...],
  "sentiment": "Overall sentiment (Positive/Negative/Neutral/Mixed)",
  "topics": ["Topic 1", "Topic 2", ...],
  "timestamps": [
    {
      "time": "MM:SS",
      "description": "What happens at this timestamp",
      "importance": "high/medium/low"
    },
    ...
  ],
  "detailedAnalysis": [
    {
      "title": "Section title",
      "content": "Detailed analysis of this section"
    },
    ...
  ],
  "keyInsights": ["Important insight 1", "Important insight 2", ...]
}

Pay special attention to important moments in the video and provide accurate timestamps. Include at least 5-10 timestamps for key moments."#;

/// Fixed sampling parameters and safety thresholds sent with every analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let threshold = HarmBlockThreshold::BlockMediumAndAbove;
        Self {
            generation_config: GenerationConfig {
                temperature: 0.4,
                top_p: 1.0,
                top_k: 32,
                max_output_tokens: 8192,
            },
            safety_settings: [
                HarmCategory::Harassment,
                HarmCategory::HateSpeech,
                HarmCategory::SexuallyExplicit,
                HarmCategory::DangerousContent,
            ]
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold,
            })
            .collect(),
        }
    }
}

/// Caller prompt, or the default when it is absent or blank.
pub fn resolve_prompt(prompt: Option<&str>) -> &str {
    match prompt {
        Some(text) if !text.trim().is_empty() => text,
        _ => DEFAULT_ANALYSIS_PROMPT,
    }
}

/// One user message: instruction text first, then the inline video.
pub fn build_request<'a>(
    prompt: &'a str,
    video: &'a EncodedVideo,
    settings: &'a GenerationSettings,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        data: &video.data,
                        mime_type: &video.mime_type,
                    },
                },
            ],
        }],
        generation_config: settings.generation_config,
        safety_settings: &settings.safety_settings,
    }
}
