use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use validator::Validate;

use crate::StorageResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewTask {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: &NewTask) -> StorageResult<Task> {
        let created: Task = sqlx::query_as(
            "INSERT INTO tasks (title, description, completed) VALUES (?, ?, ?)
             RETURNING id, title, description, completed"
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .fetch_one(&self.pool)
        .await?;

        debug!(task_id = created.id, "Inserted task");
        Ok(created)
    }

    pub async fn list(&self) -> StorageResult<Vec<Task>> {
        let tasks = sqlx::query_as("SELECT id, title, description, completed FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }
}
