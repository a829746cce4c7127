//! Endpoint configuration for the inference provider.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the chat-completion API.
///
/// The credential is deliberately not part of this struct; it is handed to
/// [`crate::OpenAiClient::new`] separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound for a single upstream round-trip.
    pub timeout: Duration
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }
    }
}

impl InferenceConfig {
    /// Reads `OPENAI_BASE_URL`, `OPENAI_MODEL` and `INFERENCE_TIMEOUT_SECS`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout: std::env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout)
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash; the client appends
    /// `/chat/completions`.
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = InferenceConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_api_base_ignores_trailing_slash() {
        let config = InferenceConfig::default().with_base_url("http://localhost:9000/v1/");
        assert_eq!(config.api_base(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_builder_overrides() {
        let config = InferenceConfig::default()
            .with_model("gpt-4o-mini")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
