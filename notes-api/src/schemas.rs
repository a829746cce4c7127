//! Request and response bodies that are not storage records.

use serde::{Deserialize, Serialize};

/// Query string of `POST /notes/ai-action-items`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionItemsQuery {
    pub description: Option<String>
}

/// Body of `POST /notes/ai-note`.
#[derive(Debug, Default, Deserialize)]
pub struct DraftNoteRequest {
    #[serde(default)]
    pub description: Option<String>
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub detail: &'static str
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str
}
