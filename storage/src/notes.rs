//! Note records and their SQLite store.
//!
//! # Invariants
//! - `id` is assigned by SQLite (`AUTOINCREMENT`), so ids are never reused.
//! - `action_items` is stored as a JSON array and keeps its order.
//! - Listing returns notes in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;
use sqlx::types::Json;
use tracing::debug;
use validator::Validate;

use crate::{StorageError, StorageResult, timestamp};

const RESOURCE: &str = "Note";

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub date: DateTime<Utc>,
    pub action_items: Vec<String>
}

/// Fields for a note that does not exist yet.
///
/// Absent `action_items` deserialize to an empty list; the two cases are not
/// distinguished anywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewNote {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub action_items: Vec<String>
}

/// Partial update. `None` leaves a field untouched.
///
/// `description` can be cleared with an explicit `null`; for the other
/// fields `null` is treated like an absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct NoteChanges {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action_items: Option<Vec<String>>
}

fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            note.description.clone_from(description);
        }
        if let Some(status) = &self.status {
            note.status.clone_from(status);
        }
        if let Some(date) = self.date {
            note.date = date;
        }
        if let Some(action_items) = &self.action_items {
            note.action_items.clone_from(action_items);
        }
    }
}

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    date: DateTime<Utc>,
    action_items: Json<Vec<String>>
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            date: row.date,
            action_items: row.action_items.0
        }
    }
}

#[derive(Clone)]
pub struct NoteStore {
    pool: SqlitePool
}

impl NoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, note: &NewNote) -> StorageResult<Note> {
        let row: NoteRow = sqlx::query_as(
            "INSERT INTO notes (title, description, status, date, action_items)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, title, description, status, date, action_items"
        )
        .bind(&note.title)
        .bind(&note.description)
        .bind(&note.status)
        .bind(note.date)
        .bind(Json(&note.action_items))
        .fetch_one(&self.pool)
        .await?;

        debug!(note_id = row.id, "Inserted note");
        Ok(row.into())
    }

    pub async fn list(&self) -> StorageResult<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            "SELECT id, title, description, status, date, action_items FROM notes ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    pub async fn get(&self, id: i64) -> StorageResult<Note> {
        let row: Option<NoteRow> = sqlx::query_as(
            "SELECT id, title, description, status, date, action_items FROM notes WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Note::from)
            .ok_or_else(|| StorageError::not_found(RESOURCE, id))
    }

    /// Applies `changes` inside one transaction and returns the stored note.
    pub async fn update(&self, id: i64, changes: &NoteChanges) -> StorageResult<Note> {
        let mut tx = self.pool.begin().await?;

        let row: Option<NoteRow> = sqlx::query_as(
            "SELECT id, title, description, status, date, action_items FROM notes WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut note: Note = row
            .map(Note::from)
            .ok_or_else(|| StorageError::not_found(RESOURCE, id))?;

        if changes.is_empty() {
            return Ok(note);
        }
        changes.apply(&mut note);

        sqlx::query(
            "UPDATE notes SET title = ?, description = ?, status = ?, date = ?, action_items = ?
             WHERE id = ?"
        )
        .bind(&note.title)
        .bind(&note.description)
        .bind(&note.status)
        .bind(note.date)
        .bind(Json(&note.action_items))
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(note_id = id, "Updated note");
        Ok(note)
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(RESOURCE, id));
        }
        debug!(note_id = id, "Deleted note");
        Ok(())
    }
}
