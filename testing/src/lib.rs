//! Shared test fixtures for the notes service workspace.
//!
//! Provides:
//! - a private in-memory SQLite database per call, schema already created
//! - JSON payload builders for the HTTP resources
//!
//! Each pool holds exactly one connection so the in-memory database lives as
//! long as the pool does.

mod fixtures;

pub use fixtures::*;
