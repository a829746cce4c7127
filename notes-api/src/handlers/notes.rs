//! `/notes` handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection}
    }
};
use storage::{NewNote, Note, NoteChanges};

use crate::error::ApiResult;
use crate::extract::{PatchJson, ValidatedJson};
use crate::orchestrator::CreationMode;
use crate::schemas::{ActionItemsQuery, DeletedResponse, DraftNoteRequest};
use crate::state::AppState;

/// POST /notes
///
/// Stores a note from explicit fields, extracting action items from the
/// description when none were given.
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    ValidatedJson(note): ValidatedJson<NewNote>
) -> ApiResult<Json<Note>> {
    let created = state
        .orchestrator
        .create(CreationMode::Explicit(note))
        .await?;
    Ok(Json(created))
}

/// GET /notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Note>>> {
    let notes = state.notes.list().await?;
    tracing::debug!(count = notes.len(), "Listing notes");
    Ok(Json(notes))
}

/// GET /notes/{id}
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>
) -> ApiResult<Json<Note>> {
    let Path(id) = id?;
    Ok(Json(state.notes.get(id).await?))
}

/// PUT /notes/{id}
///
/// Partial update; an empty body returns the note unchanged.
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    PatchJson(changes): PatchJson<NoteChanges>
) -> ApiResult<Json<Note>> {
    let Path(id) = id?;
    Ok(Json(state.notes.update(id, &changes).await?))
}

/// DELETE /notes/{id}
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>
) -> ApiResult<Json<DeletedResponse>> {
    let Path(id) = id?;
    state.notes.delete(id).await?;
    Ok(Json(DeletedResponse {
        detail: "Note deleted"
    }))
}

/// POST /notes/ai-action-items?description=...
pub async fn generate_action_items(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ActionItemsQuery>, QueryRejection>
) -> ApiResult<Json<Vec<String>>> {
    let Query(query) = query?;
    let description = query.description.unwrap_or_default();
    let items = state.orchestrator.extract_action_items(&description).await?;
    Ok(Json(items))
}

/// POST /notes/ai-note
///
/// Drafts and stores a whole note from `{"description": ...}`.
pub async fn draft_note(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DraftNoteRequest>, JsonRejection>
) -> ApiResult<Json<Note>> {
    let Json(request) = body?;
    let created = state
        .orchestrator
        .create(CreationMode::Drafted {
            description: request.description.unwrap_or_default()
        })
        .await?;
    Ok(Json(created))
}
