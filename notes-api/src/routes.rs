//! Route definitions for the notes service.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post}
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer
};

use crate::handlers::{catalog, notes, ops};
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
///
/// Collection routes answer with and without a trailing slash.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notes_collection = get(notes::list_notes).post(notes::create_note);
    let tasks_collection = get(catalog::list_tasks).post(catalog::create_task);
    let products_collection = get(catalog::list_products).post(catalog::create_product);

    Router::new()
        .route("/notes", notes_collection.clone())
        .route("/notes/", notes_collection)
        .route("/notes/ai-action-items", post(notes::generate_action_items))
        .route("/notes/ai-note", post(notes::draft_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note)
        )
        .route("/tasks", tasks_collection.clone())
        .route("/tasks/", tasks_collection)
        .route("/products", products_collection.clone())
        .route("/products/", products_collection)
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
