//! API key resolution.

use std::fmt;

use tracing::{debug, error, warn};

use crate::InferenceResult;
use errors::InferenceError;

/// Environment variable holding the provider secret.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Reads the raw, unnormalized secret from the process environment.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

/// A normalized provider secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Normalizes a raw secret.
    ///
    /// Absent or blank values fail with `UpstreamUnavailable`. Surrounding
    /// whitespace is trimmed; control whitespace anywhere in the raw value is
    /// logged but accepted.
    pub fn resolve(raw: Option<&str>) -> InferenceResult<Self> {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            error!("{API_KEY_ENV} is not set; cannot call the inference provider");
            return Err(InferenceError::unavailable(format!(
                "{API_KEY_ENV} environment variable is not set"
            )));
        };

        let trimmed = raw.trim();
        if trimmed.len() != raw.len() {
            warn!("{API_KEY_ENV} contained surrounding whitespace; stripping");
        }
        if raw.contains(['\n', '\r', '\t']) {
            warn!("{API_KEY_ENV} contained control whitespace characters (e.g., newline)");
        }
        debug!("Inference credential resolved");

        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
