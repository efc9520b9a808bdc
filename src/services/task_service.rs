use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::{CreateTaskInput, DeleteTaskInput, Task, ToggleTaskInput, UpdateTaskInput};
use crate::store::TaskStore;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    NotFound,
    Storage,
}

/// Outcome of a mutation. A success tells the caller that any task list it
/// rendered earlier is stale and must be fetched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<FailureKind>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
            kind: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            kind: Some(kind),
        }
    }

    fn from_error(err: &AppError, fallback: &str) -> Self {
        let kind = match err {
            AppError::NotFound => FailureKind::NotFound,
            _ => FailureKind::Storage,
        };
        if err.detail().trim().is_empty() {
            Self::failure(kind, fallback)
        } else {
            Self::failure(kind, err.to_string())
        }
    }

    fn rejected(err: ValidationError) -> Self {
        Self::failure(FailureKind::Validation, err.message)
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    timeout: Duration,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn create_task(&self, input: CreateTaskInput) -> ActionResult {
        let new = match validation::validate_create(&input) {
            Ok(new) => new,
            Err(e) => {
                warn!("create rejected: {}", e);
                return ActionResult::rejected(e);
            }
        };

        match self.guarded(self.store.insert(new)).await {
            Ok(task) => {
                info!(id = %task.id, "task created");
                ActionResult::success()
            }
            Err(e) => {
                warn!("create failed: {}", e);
                ActionResult::from_error(&e, "Failed to create task")
            }
        }
    }

    /// Never fails: a read error is logged and degrades to an empty list.
    pub async fn get_tasks(&self) -> Vec<Task> {
        match self.guarded(self.store.list_all()).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("Failed to fetch tasks: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn update_task(&self, input: UpdateTaskInput) -> ActionResult {
        let (id, patch) = match validation::validate_update(&input) {
            Ok(v) => v,
            Err(e) => {
                warn!("update rejected: {}", e);
                return ActionResult::rejected(e);
            }
        };

        match self.guarded(self.store.update_by_id(id, patch)).await {
            Ok(_) => {
                info!(%id, "task updated");
                ActionResult::success()
            }
            Err(e) => {
                warn!(%id, "update failed: {}", e);
                ActionResult::from_error(&e, "Failed to update task")
            }
        }
    }

    pub async fn toggle_task(&self, input: ToggleTaskInput) -> ActionResult {
        let (id, completed) = match validation::validate_toggle(&input) {
            Ok(v) => v,
            Err(e) => {
                warn!("toggle rejected: {}", e);
                return ActionResult::rejected(e);
            }
        };

        let patch = crate::models::TaskPatch::completed(completed);
        match self.guarded(self.store.update_by_id(id, patch)).await {
            Ok(_) => {
                info!(%id, completed, "task toggled");
                ActionResult::success()
            }
            Err(e) => {
                warn!(%id, "toggle failed: {}", e);
                ActionResult::from_error(&e, "Failed to toggle task")
            }
        }
    }

    pub async fn delete_task(&self, input: DeleteTaskInput) -> ActionResult {
        let id = match validation::validate_delete(&input) {
            Ok(id) => id,
            Err(e) => {
                warn!("delete rejected: {}", e);
                return ActionResult::rejected(e);
            }
        };

        match self.guarded(self.store.delete_by_id(id)).await {
            Ok(()) => {
                info!(%id, "task deleted");
                ActionResult::success()
            }
            Err(e) => {
                warn!(%id, "delete failed: {}", e);
                ActionResult::from_error(&e, "Failed to delete task")
            }
        }
    }

    async fn guarded<T, F>(&self, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AppError::Timeout)?
    }
}
