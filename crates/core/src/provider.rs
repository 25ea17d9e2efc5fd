use std::fmt;

use crate::error::ProviderError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_BASE_ENV_VAR: &str = "REELSIGHT_API_BASE";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_base: String,
    pub env_var: &'static str,
    /// Substring a model name must contain to be offered in the catalog.
    pub model_family: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            env_var: "GEMINI_API_KEY",
            model_family: "gemini",
        }
    }
}

impl ProviderConfig {
    /// Default config with the base URL taken from `REELSIGHT_API_BASE` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var(API_BASE_ENV_VAR) {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.api_base = base.to_string();
            }
        }
        config
    }

    pub fn name(&self) -> &'static str {
        "Gemini"
    }

    /// Resolve the credential from the configured environment variable
    pub fn credential_from_env(&self) -> Result<Credential, ProviderError> {
        std::env::var(self.env_var)
            .ok()
            .and_then(Credential::new)
            .ok_or_else(|| ProviderError::MissingApiKey {
                env_var: self.env_var.to_string(),
            })
    }
}

/// User-supplied API key. Held in memory only and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty or whitespace-only key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("AIza-secret").unwrap();
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret"));
        assert_eq!(credential.expose(), "AIza-secret");
    }

    #[test]
    fn blank_credential_is_rejected() {
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new("  key \n").unwrap().expose(), "key");
    }

    #[test]
    fn default_config_targets_gemini() {
        let config = ProviderConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.env_var, "GEMINI_API_KEY");
        assert_eq!(config.model_family, "gemini");
    }
}
