//! Reelsight Core Library
//!
//! Validates a Gemini API key, lists the multimodal models it may use, sends a video for
//! analysis and normalizes the reply into a [`VideoAnalysis`].

pub mod analyzer;
pub mod catalog;
pub mod client;
pub mod encoder;
pub mod error;
pub mod format;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod session;
pub mod types;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items at crate root
pub use analyzer::request_analysis;
pub use catalog::{fetch_models, filter_models, validate_api_key};
pub use client::{GeminiClient, GenerativeApi};
pub use encoder::{encode_bytes, encode_video};
pub use error::{ProviderError, ReelsightError, Result};
pub use format::{format_analysis_readable, format_analysis_with, format_timestamp, parse_timestamp};
pub use normalize::{Normalized, normalize_response};
pub use pipeline::{AnalysisOutcome, AnalysisStage, AnalysisStatus, VideoJob, analyze_video};
pub use prompt::{DEFAULT_ANALYSIS_PROMPT, GenerationSettings};
pub use provider::{Credential, ProviderConfig};
pub use report::{AnalysisReport, get_report_path, get_reports_dir, load_report, save_report};
pub use session::Session;
pub use types::{
    AnalysisRequest, DetailedSection, EncodedVideo, Importance, ModelDescriptor, Timestamp,
    VideoAnalysis,
};
