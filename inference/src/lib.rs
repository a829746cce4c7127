//! # Inference
//!
//! Calls a remote chat-completion provider and turns its free-form output
//! into note data.
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐     ┌──────────────┐
//! │ NoteFieldInferrer│────►│ ActionItemExtractor │────►│TextCompletion│──► provider
//! └──────────────────┘     └─────────────────────┘     └──────────────┘
//!          │                                                  ▲
//!          └──────────────────────────────────────────────────┘
//! ```
//!
//! Every parse path reports whether the model output was used as-is
//! ([`Outcome::Parsed`]) or recovered by a fallback ([`Outcome::Degraded`]).
//! Provider failures are returned as [`InferenceError`] and are never
//! swallowed here; callers pick their own fail-open policy.

pub mod client;
pub mod config;
pub mod credential;
pub mod extractor;
pub mod mock;
pub mod note_fields;
pub mod outcome;

pub use client::{CompletionRequest, OpenAiClient, TextCompletion};
pub use config::InferenceConfig;
pub use credential::ApiKey;
pub use errors::InferenceError;
pub use extractor::ActionItemExtractor;
pub use mock::MockCompletion;
pub use note_fields::{MAX_ACTION_ITEMS, NoteDraft, NoteFieldInferrer};
pub use outcome::Outcome;

/// Result type alias for inference operations.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;

/// Sampling temperature used for every extraction prompt.
pub const EXTRACTION_TEMPERATURE: f32 = 0.3;
