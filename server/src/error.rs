//! Unified error handling for the server.
//!
//! Every failure is rendered as the `{success: false, message}` envelope
//! clients already parse for mutations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use listsync_engine::wire::messages;
use listsync_engine::ApiResponse;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(#[from] listsync_engine::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{}", messages::NOT_FOUND)]
    NotFound,

    #[error("{}", messages::SIGN_IN)]
    Unauthorized,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Something went wrong".to_string()
            }
            AppError::Validation(e) => {
                tracing::warn!("Rejected payload: {}", e);
                e.to_string()
            }
            AppError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        };

        (self.status(), Json(ApiResponse::failure(message))).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
