use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::error;

use crate::state::AppState;
use crate::{api, web};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(web::router())
        .nest("/api", api::router())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("select 1").execute(&state.db).await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!("health check failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
