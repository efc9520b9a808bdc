pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
pub mod web;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::TaskService;
use crate::state::AppState;
use crate::store::SqliteTaskStore;
use crate::web::view::Templates;

/// Wires the store, handlers and templates around an open pool.
pub fn build_state(db: SqlitePool, config: &AppConfig) -> Result<AppState, AppError> {
    let store = Arc::new(SqliteTaskStore::new(db.clone()));

    Ok(AppState {
        db,
        tasks: TaskService::new(store, config.store_timeout),
        templates: Arc::new(Templates::new()?),
    })
}
