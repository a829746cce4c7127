//! # Storage Layer
//!
//! SQLite persistence for notes, tasks and products.
//!
//! Every store wraps the shared [`SqlitePool`]; each operation borrows one
//! pooled connection (or one transaction) for its own duration only.

pub mod notes;
pub mod products;
pub mod tasks;
pub mod timestamp;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

pub use notes::{NewNote, Note, NoteChanges, NoteStore};
pub use products::{Product, ProductStore};
pub use tasks::{NewTask, Task, TaskStore};

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists: {reason}")]
    Conflict {
        resource: &'static str,
        reason: String
    }
}

impl StorageError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string()
        }
    }

    /// Maps unique-constraint violations to `Conflict`, everything else to
    /// `Database`.
    pub(crate) fn on_insert(resource: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                resource,
                reason: db.message().to_string()
            },
            other => Self::Database(other)
        }
    }
}

/// Opens a pool against `database_url` and creates the schema.
pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;
    info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Creates all tables. Safe to run repeatedly.
pub async fn initialize_schema(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL,
            date TEXT NOT NULL,
            action_items TEXT NOT NULL DEFAULT '[]'
        )"
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_title ON notes(title)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL DEFAULT 0
        )"
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_title ON tasks(title)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            sku TEXT NOT NULL UNIQUE,
            document TEXT NOT NULL -- full product as JSON
        )"
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_name ON products(name)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::not_found("Note", 42);
        assert_eq!(err.to_string(), "Note not found: 42");
    }

    #[test]
    fn test_conflict_display() {
        let err = StorageError::Conflict {
            resource: "Product",
            reason: "UNIQUE constraint failed: products.sku".to_string()
        };
        assert_eq!(
            err.to_string(),
            "Product already exists: UNIQUE constraint failed: products.sku"
        );
    }
}
