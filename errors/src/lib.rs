//! # Notes Service Errors
//!
//! Error types shared between the inference layer and the HTTP layer.
//!
//! - Uses `thiserror` for structured error definitions
//! - Variants carry named fields so messages stay self-describing

use thiserror::Error;

/// Failures talking to the remote text-inference provider.
///
/// The two variants must stay distinguishable: callers decide whether a
/// missing credential and a failed call are handled the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// No usable credential, or the provider rejected the one we sent.
    #[error("Inference provider unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    /// Network failure, timeout, error status or undecodable response.
    #[error("Inference call failed: {reason}")]
    UpstreamCallFailed { reason: String }
}

impl InferenceError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.into()
        }
    }

    pub fn call_failed(reason: impl Into<String>) -> Self {
        Self::UpstreamCallFailed {
            reason: reason.into()
        }
    }

    /// Stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "unavailable",
            Self::UpstreamCallFailed { .. } => "call_failed"
        }
    }
}

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid field: {field} reason: {reason}")]
    InvalidField { field: String, reason: String }
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_error_display() {
        let err = InferenceError::unavailable("OPENAI_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Inference provider unavailable: OPENAI_API_KEY is not set"
        );

        let err = InferenceError::call_failed("timed out");
        assert_eq!(err.to_string(), "Inference call failed: timed out");
    }

    #[test]
    fn test_inference_error_kinds_are_distinct() {
        assert_eq!(InferenceError::unavailable("x").kind(), "unavailable");
        assert_eq!(InferenceError::call_failed("x").kind(), "call_failed");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::invalid("date", "not an ISO-8601 timestamp");
        assert_eq!(
            err.to_string(),
            "Invalid field: date reason: not an ISO-8601 timestamp"
        );
    }
}
