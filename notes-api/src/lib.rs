//! # Notes API
//!
//! HTTP service for notes, tasks and products. Notes can be written out in
//! full or drafted from a free-text description by a chat-completion model.
//!
//! ## Endpoints
//!
//! - `POST /notes`, `GET /notes` - Create (extracting missing action items) and list notes
//! - `GET|PUT|DELETE /notes/{id}` - Read, partially update and delete one note
//! - `POST /notes/ai-action-items?description=` - Action items for a description
//! - `POST /notes/ai-note` - Draft and store a whole note from `{"description"}`
//! - `POST /tasks`, `GET /tasks` - Tasks
//! - `POST /products`, `GET /products` - Catalogue products
//! - `GET /health` - Health check endpoint
//! - `GET /metrics` - Prometheus metrics endpoint
//!
//! ## Failure policy
//!
//! Explicit note creation never fails because of the model: extraction
//! errors leave the note without action items. Drafted creation and the
//! standalone extraction endpoint answer 502 instead.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod routes;
pub mod schemas;
pub mod server;
pub mod state;
pub mod telemetry;

pub use error::{ApiError, ApiResult};
pub use orchestrator::{CreationMode, NoteOrchestrator};
pub use routes::create_router;
pub use server::NotesServer;
pub use state::{AppState, ServerConfig};
