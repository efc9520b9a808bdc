use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Task not found")]
    NotFound,

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Storage operation timed out")]
    Timeout,

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Template(_)
            | AppError::Timeout
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message carried by the error, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            AppError::Database(e) => e.to_string(),
            AppError::Migration(e) => e.to_string(),
            AppError::Template(e) => e.to_string(),
            AppError::Config(message) => message.clone(),
            AppError::NotFound | AppError::Timeout => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(e) => {
                error!("database error: {}", e);
                "Database error occurred".to_string()
            }
            AppError::Template(e) => {
                error!("template error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Migration(_) | AppError::Config(_) => {
                error!("{}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_drops_the_prefix() {
        let err = AppError::Config("disk I/O error".to_string());
        assert_eq!(err.to_string(), "Configuration error: disk I/O error");
        assert_eq!(err.detail(), "disk I/O error");
        assert_eq!(AppError::Config(String::new()).detail(), "");
        assert_eq!(AppError::Timeout.detail(), "Storage operation timed out");
    }

    #[test]
    fn timeout_is_a_server_error() {
        assert_eq!(AppError::Timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound.to_string(), "Task not found");
    }
}
