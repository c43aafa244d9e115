//! Vision provider configuration from the process environment
//!
//! A missing credential is a configuration error, distinguishable from
//! runtime extraction failure: it is fatal to any extraction attempt and
//! not retryable without operator action.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the provider credential (required).
pub const ENV_API_KEY: &str = "ECOMAP_VISION_API_KEY";
/// Environment variable overriding the provider endpoint (optional).
pub const ENV_API_URL: &str = "ECOMAP_VISION_URL";
/// Environment variable overriding the model name (optional).
pub const ENV_MODEL: &str = "ECOMAP_VISION_MODEL";
/// Environment variable overriding the request timeout in seconds (optional).
pub const ENV_TIMEOUT_SECS: &str = "ECOMAP_VISION_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable `{0}` is not set")]
    MissingCredential(&'static str),
}

/// Resolved vision provider settings.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(ENV_API_KEY))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Some(secs) = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_everything_but_the_credential() {
        let config = VisionConfig::new("sk-test");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn builders_override_defaults() {
        let config = VisionConfig::new("sk-test")
            .with_api_url("https://router.example/v1")
            .with_model("pixtral")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_url, "https://router.example/v1");
        assert_eq!(config.model, "pixtral");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
