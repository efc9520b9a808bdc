pub mod view;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::api::status_for;
use crate::error::AppError;
use crate::models::{CreateTaskInput, DeleteTaskInput, ToggleTaskInput, UpdateTaskInput};
use crate::services::{ActionResult, FailureKind};
use crate::state::AppState;
use crate::validation;

use self::view::{Draft, FormEvent, FormState, ItemEvent, ItemState, PageState};

// Cancel links point back at `/`, whose default page state is the
// Collapsed form with every item Viewing.

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/tasks", post(create_task))
        .route("/tasks/{id}/edit", post(update_task))
        .route("/tasks/{id}/toggle", post(toggle_task))
        .route("/tasks/{id}/delete", post(delete_task))
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    form: Option<String>,
    edit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: String,
}

impl TaskForm {
    fn draft(&self) -> Draft {
        Draft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ToggleForm {
    #[serde(default)]
    completed: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Renders the list, freshly fetched, with the given UI state.
async fn render(state: &AppState, page: &PageState, result: &ActionResult) -> Result<Response, AppError> {
    let tasks = state.tasks.get_tasks().await;
    let html = state.templates.render_page(tasks, page)?;
    Ok((status_for(result), Html(html)).into_response())
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let mut page = PageState::default();
    if query.form.as_deref() == Some("open") {
        page.form = page.form.next(FormEvent::Open);
    }
    if let Some(id) = query.edit {
        page.item_event(id, ItemEvent::Edit);
    }

    render(&state, &page, &ActionResult::success()).await
}

async fn create_task(
    State(state): State<AppState>,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    let draft = form.draft();
    let input = CreateTaskInput {
        title: form.title,
        description: non_empty(form.description),
        priority: non_empty(form.priority),
    };

    let result = state.tasks.create_task(input).await;
    let next = FormState::Expanded.next(FormEvent::Submitted { ok: result.success });
    if next == FormState::Collapsed {
        return Ok(Redirect::to("/").into_response());
    }

    let page = PageState {
        form: next,
        form_error: result.error.clone(),
        draft: Some(draft),
        ..PageState::default()
    };
    render(&state, &page, &result).await
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    let draft = form.draft();
    let input = UpdateTaskInput {
        id: id.clone(),
        title: Some(form.title),
        // An emptied textarea clears the description.
        description: Some(non_empty(form.description)),
        priority: non_empty(form.priority),
        completed: None,
    };

    let result = state.tasks.update_task(input).await;
    let mut page = PageState {
        editing: Some(id.clone()),
        ..PageState::default()
    };
    page.item_event(id.clone(), ItemEvent::Saved { ok: result.success });
    if page.item_state(&id) == ItemState::Viewing {
        return Ok(Redirect::to("/").into_response());
    }

    page.edit_draft = Some(draft);
    page.item_error = result.error.clone().map(|message| (id, message));
    render(&state, &page, &result).await
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Response, AppError> {
    let result = match validation::parse_completed(&form.completed) {
        Ok(completed) => {
            state
                .tasks
                .toggle_task(ToggleTaskInput {
                    id: id.clone(),
                    completed: Some(Value::Bool(completed)),
                })
                .await
        }
        Err(e) => ActionResult::failure(FailureKind::Validation, e.message),
    };

    item_outcome(&state, id, result).await
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let result = state.tasks.delete_task(DeleteTaskInput { id: id.clone() }).await;
    item_outcome(&state, id, result).await
}

async fn item_outcome(state: &AppState, id: String, result: ActionResult) -> Result<Response, AppError> {
    if result.success {
        return Ok(Redirect::to("/").into_response());
    }

    let page = PageState {
        item_error: result.error.clone().map(|message| (id, message)),
        ..PageState::default()
    };
    render(state, &page, &result).await
}
