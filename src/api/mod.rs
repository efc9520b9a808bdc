use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::{Router, http::StatusCode, routing::get};
use tracing::warn;

use crate::models::{CreateTaskInput, DeleteTaskInput, Task, ToggleTaskInput, UpdateTaskInput};
use crate::services::{ActionResult, FailureKind};
use crate::state::AppState;

type ActionResponse = (StatusCode, Json<ActionResult>);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .route("/tasks/{id}/toggle", post(toggle_task))
}

pub fn status_for(result: &ActionResult) -> StatusCode {
    match result.kind {
        None => StatusCode::OK,
        Some(FailureKind::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureKind::NotFound) => StatusCode::NOT_FOUND,
        Some(FailureKind::Storage) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(result: ActionResult) -> ActionResponse {
    (status_for(&result), Json(result))
}

// A body that does not even deserialize is a validation failure too.
fn malformed(rejection: JsonRejection) -> ActionResponse {
    warn!("rejected request body: {}", rejection.body_text());
    respond(ActionResult::failure(
        FailureKind::Validation,
        rejection.body_text(),
    ))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.tasks.get_tasks().await)
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskInput>, JsonRejection>,
) -> ActionResponse {
    match body {
        Ok(Json(input)) => respond(state.tasks.create_task(input).await),
        Err(rejection) => malformed(rejection),
    }
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> ActionResponse {
    match body {
        Ok(Json(input)) => respond(state.tasks.update_task(UpdateTaskInput { id, ..input }).await),
        Err(rejection) => malformed(rejection),
    }
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ToggleTaskInput>, JsonRejection>,
) -> ActionResponse {
    match body {
        Ok(Json(input)) => respond(state.tasks.toggle_task(ToggleTaskInput { id, ..input }).await),
        Err(rejection) => malformed(rejection),
    }
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ActionResponse {
    respond(state.tasks.delete_task(DeleteTaskInput { id }).await)
}
