use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::types::{DetailedSection, Timestamp, VideoAnalysis};

/// Result of normalizing one provider reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub analysis: VideoAnalysis,
    /// Set when the reply was not a JSON object and only the raw text survived.
    pub degraded: bool,
}

/// Decode the reply into a [`VideoAnalysis`], falling back field by field.
///
/// Never fails: text that is not a JSON object becomes the summary of an otherwise empty analysis.
pub fn normalize_response(text: &str) -> Normalized {
    let object = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            warn!(kind = json_kind(&other), "analysis reply is JSON but not an object");
            return degraded(text);
        }
        Err(e) => {
            warn!(error = %e, "failed to parse analysis reply as JSON");
            return degraded(text);
        }
    };

    let summary = non_empty_string(&object, "summary").unwrap_or_else(|| text.to_string());
    let sentiment = non_empty_string(&object, "sentiment")
        .unwrap_or_else(|| VideoAnalysis::UNKNOWN_SENTIMENT.to_string());

    Normalized {
        analysis: VideoAnalysis {
            summary,
            key_points: list::<String>(&object, "keyPoints"),
            sentiment,
            topics: list::<String>(&object, "topics"),
            timestamps: list::<Timestamp>(&object, "timestamps"),
            detailed_analysis: list::<DetailedSection>(&object, "detailedAnalysis"),
            key_insights: list::<String>(&object, "keyInsights"),
        },
        degraded: false,
    }
}

fn degraded(text: &str) -> Normalized {
    Normalized {
        analysis: VideoAnalysis::from_raw_text(text),
        degraded: true,
    }
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Non-array values count as absent; malformed elements are dropped one by one.
fn list<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(items) = object.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    let decoded: Vec<T> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    if decoded.len() != items.len() {
        warn!(
            field = key,
            dropped = items.len() - decoded.len(),
            "dropped malformed entries from analysis reply"
        );
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
