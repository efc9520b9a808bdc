use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// The four operations the handlers need from durable storage.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: NewTask) -> Result<Task, AppError>;
    async fn list_all(&self) -> Result<Vec<Task>, AppError>;
    async fn update_by_id(&self, id: TaskId, patch: TaskPatch) -> Result<Task, AppError>;
    async fn delete_by_id(&self, id: TaskId) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SqliteTaskStore {
    db: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        Ok(repository::insert_task(&self.db, task).await?)
    }

    async fn list_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(repository::fetch_tasks(&self.db).await?)
    }

    async fn update_by_id(&self, id: TaskId, patch: TaskPatch) -> Result<Task, AppError> {
        repository::update_task(&self.db, &id.to_string(), patch)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<(), AppError> {
        if repository::delete_task(&self.db, &id.to_string()).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}
