use thiserror::Error;

/// Failures talking to the generative-AI provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Response blocked: {reason}")]
    Blocked { reason: String },
}

#[derive(Error, Debug)]
pub enum ReelsightError {
    #[error("Invalid API key. Please check and try again.")]
    InvalidApiKey,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No model selected")]
    NoModelSelected,

    #[error("Model {name} is not available for this API key")]
    UnknownModel { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ReelsightError {
    /// True when the error came from the provider round trip rather than local state.
    pub fn is_provider(&self) -> bool {
        matches!(self, ReelsightError::Provider(_))
    }
}

pub type Result<T> = std::result::Result<T, ReelsightError>;
