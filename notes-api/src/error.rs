//! Error types for the notes HTTP service.

use axum::{
    Json,
    extract::rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response}
};
use errors::InferenceError;
use serde::Serialize;
use storage::StorageError;
use thiserror::Error;

/// Result type alias for handlers and the orchestrator.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Blank or missing free-text input.
    #[error("{0}")]
    ClientInput(String),

    /// Request body or parameters failed to parse or validate.
    #[error("Invalid request: {message}")]
    Validation { status: StatusCode, message: String },

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{resource} already exists: {reason}")]
    Conflict {
        resource: &'static str,
        reason: String
    },

    /// The inference provider could not produce a result.
    #[error("{detail}: {source}")]
    Upstream {
        detail: &'static str,
        source: InferenceError
    },

    /// Inferred fields could not form a valid note.
    #[error("Inferred note fields are invalid: {0}")]
    InferenceCoercion(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Server error: {0}")]
    Server(String)
}

impl ApiError {
    pub fn client_input(message: impl Into<String>) -> Self {
        Self::ClientInput(message.into())
    }

    pub fn upstream(detail: &'static str, source: InferenceError) -> Self {
        Self::Upstream { detail, source }
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into()
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, .. } => Self::NotFound { resource },
            StorageError::Conflict { resource, reason } => Self::Conflict { resource, reason },
            StorageError::Database(e) => Self::Database(e)
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::unprocessable(errors.to_string())
    }
}

/// Keeps axum's status choice: 400 for bad syntax, 415 for a missing JSON
/// content type, 422 for a body of the wrong shape.
macro_rules! rejection_into_validation {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::Validation {
                        status: rejection.status(),
                        message: rejection.body_text()
                    }
                }
            }
        )+
    };
}

rejection_into_validation!(JsonRejection, BytesRejection, PathRejection, QueryRejection);

/// Error response body for HTTP endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            Self::ClientInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
            Self::Validation { status, message } => (*status, "VALIDATION_ERROR", message.clone()),
            Self::NotFound { resource } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{resource} not found"))
            }
            Self::Conflict { resource, reason } => {
                tracing::debug!(resource, reason = %reason, "Rejected duplicate record");
                (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("{resource} already exists")
                )
            }
            Self::Upstream { detail, source } => {
                tracing::warn!(error = %source, kind = source.kind(), "Inference provider failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", (*detail).to_string())
            }
            Self::InferenceCoercion(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INFERENCE_COERCION",
                format!("Inferred note fields are invalid: {msg}")
            ),
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string()
                )
            }
            Self::Configuration(msg) | Self::Server(msg) => {
                tracing::error!(message = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string()
                )
            }
        };

        let body = ErrorResponse {
            detail,
            code: code.to_string()
        };

        (status, Json(body)).into_response()
    }
}
