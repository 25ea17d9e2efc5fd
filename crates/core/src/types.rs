use serde::{Deserialize, Deserializer, Serialize};

/// A provider model the credential may use for video analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub input_token_limit: u64,
    pub output_token_limit: u64,
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    /// Model id without the `models/` prefix, e.g. `gemini-1.5-pro`.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedVideo {
    /// Base64 (standard alphabet, padded) of the whole file.
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub model_name: String,
    pub video: EncodedVideo,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub sentiment: String,
    pub topics: Vec<String>,
    pub timestamps: Vec<Timestamp>,
    pub detailed_analysis: Vec<DetailedSection>,
    pub key_insights: Vec<String>,
}

impl VideoAnalysis {
    pub const UNKNOWN_SENTIMENT: &'static str = "Unknown";

    /// Minimal analysis carrying only the raw provider text.
    pub fn from_raw_text(text: &str) -> Self {
        Self {
            summary: text.to_string(),
            key_points: Vec::new(),
            sentiment: Self::UNKNOWN_SENTIMENT.to_string(),
            topics: Vec::new(),
            timestamps: Vec::new(),
            detailed_analysis: Vec::new(),
            key_insights: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    /// "MM:SS" or "HH:MM:SS"
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub importance: Importance,
}

impl Timestamp {
    /// Offset in seconds for seeking, see [`crate::format::parse_timestamp`].
    pub fn seconds(&self) -> u64 {
        crate::format::parse_timestamp(&self.time)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl From<&str> for Importance {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Importance::High,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }
}

// Models are loose with casing ("High") and occasionally invent levels.
impl<'de> Deserialize<'de> for Importance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Importance::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSection {
    pub title: String,
    pub content: String,
}
