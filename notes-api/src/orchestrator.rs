//! Note creation with optional AI assistance.
//!
//! Two creation modes share one persist step:
//!
//! - [`CreationMode::Explicit`]: the caller supplies every required field.
//!   Missing action items are extracted from the description, and an
//!   extraction failure is absorbed (the note is stored with none).
//! - [`CreationMode::Drafted`]: only a description is supplied. The whole
//!   note is inferred; a provider failure fails the request and nothing is
//!   stored.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use inference::{
    ActionItemExtractor, MAX_ACTION_ITEMS, NoteDraft, NoteFieldInferrer, TextCompletion
};
use serde_json::json;
use storage::{NewNote, Note, NoteStore};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::telemetry::Telemetry;

pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const ACTION_ITEMS_FAILED: &str = "Failed to generate action items";
pub const NOTE_DRAFT_FAILED: &str = "Failed to generate note";

/// How a note's fields are obtained.
#[derive(Debug, Clone)]
pub enum CreationMode {
    Explicit(NewNote),
    Drafted { description: String }
}

impl CreationMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Drafted { .. } => "drafted"
        }
    }
}

#[derive(Clone)]
pub struct NoteOrchestrator {
    notes: NoteStore,
    extractor: ActionItemExtractor,
    inferrer: Arc<NoteFieldInferrer>
}

impl NoteOrchestrator {
    pub fn new(notes: NoteStore, completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            notes,
            extractor: ActionItemExtractor::new(completion.clone()),
            inferrer: Arc::new(NoteFieldInferrer::new(completion))
        }
    }

    /// Resolves the note's fields for `mode`, stores it and returns the
    /// stored record.
    pub async fn create(&self, mode: CreationMode) -> ApiResult<Note> {
        let label = mode.label();
        let note = match mode {
            CreationMode::Explicit(note) => self.with_action_items(note).await,
            CreationMode::Drafted { description } => self.draft(description).await?
        };

        let created = self.notes.create(&note).await?;
        Telemetry::record_note_created(label);
        info!(note_id = created.id, mode = label, "Note created");
        Ok(created)
    }

    /// Runs the standalone extractor, surfacing provider failures.
    pub async fn extract_action_items(&self, description: &str) -> ApiResult<Vec<String>> {
        if description.trim().is_empty() {
            return Err(ApiError::client_input(DESCRIPTION_REQUIRED));
        }

        match self.extractor.extract(description).await {
            Ok(outcome) => {
                Telemetry::record_inference("action_items", outcome.label());
                Ok(outcome.into_inner())
            }
            Err(e) => {
                Telemetry::record_inference("action_items", e.kind());
                Err(ApiError::upstream(ACTION_ITEMS_FAILED, e))
            }
        }
    }

    async fn with_action_items(&self, mut note: NewNote) -> NewNote {
        if !note.action_items.is_empty() {
            return note;
        }
        let result = match note.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {
                self.extractor.extract(description).await
            }
            _ => return note
        };

        match result {
            Ok(outcome) => {
                Telemetry::record_inference("action_items", outcome.label());
                note.action_items = outcome.into_inner();
                note.action_items.truncate(MAX_ACTION_ITEMS);
            }
            Err(e) => {
                warn!(error = %e, "Action item extraction failed; storing note without them");
                Telemetry::record_inference("action_items", e.kind());
                Telemetry::record_fail_open();
            }
        }
        note
    }

    async fn draft(&self, description: String) -> ApiResult<NewNote> {
        if description.trim().is_empty() {
            return Err(ApiError::client_input(DESCRIPTION_REQUIRED));
        }

        let outcome = match self.inferrer.infer(&description).await {
            Ok(outcome) => outcome,
            Err(e) => {
                Telemetry::record_inference("note_fields", e.kind());
                return Err(ApiError::upstream(NOTE_DRAFT_FAILED, e));
            }
        };
        Telemetry::record_inference("note_fields", outcome.label());
        if outcome.is_degraded() {
            debug!("Drafting note from fallback fields");
        }

        coerce_draft(outcome.into_inner(), description)
    }
}

/// Turns an inferred draft into a note, keeping the caller's description.
///
/// An empty date becomes the current UTC time. Everything else goes through
/// the same deserialization and validation as a client-supplied note.
fn coerce_draft(draft: NoteDraft, description: String) -> ApiResult<NewNote> {
    let date = if draft.date.is_empty() {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    } else {
        draft.date
    };

    let payload = json!({
        "title": draft.title,
        "description": description,
        "status": draft.status,
        "date": date,
        "action_items": draft.action_items
    });

    let note: NewNote =
        serde_json::from_value(payload).map_err(|e| ApiError::InferenceCoercion(e.to_string()))?;
    note.validate()
        .map_err(|e| ApiError::InferenceCoercion(e.to_string()))?;
    Ok(note)
}
