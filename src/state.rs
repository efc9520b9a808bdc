use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::TaskService;
use crate::web::view::Templates;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tasks: TaskService,
    pub templates: Arc<Templates>,
}
