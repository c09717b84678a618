//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use task_store::TaskStoreError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Store(#[from] TaskStoreError),
}

impl From<entities::ValidationError> for ServerError {
    fn from(e: entities::ValidationError) -> Self {
        Self::Store(TaskStoreError::Validation(e))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Store(TaskStoreError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ServerError::Store(TaskStoreError::NotFound { id }) => {
                (StatusCode::NOT_FOUND, format!("Task not found: {id}"))
            }
            ServerError::Store(e) => {
                // Storage faults reach clients as a generic message only.
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type ServerResult<T> = Result<T, ServerError>;
