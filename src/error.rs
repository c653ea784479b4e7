/// Unified error types for the indieglue service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum GlueError {
    /// Request validation errors (bad or missing parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Origin fetch errors (unreachable, non-2xx, body read failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Cache backend errors (never fatal; callers degrade to a miss)
    #[error("Cache backend error: {0}")]
    Cache(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert GlueError to HTTP response
impl IntoResponse for GlueError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            GlueError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            GlueError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            GlueError::Transport(_) => (StatusCode::NOT_FOUND, "UpstreamUnavailable", self.to_string()),
            GlueError::Cache(_) | GlueError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                self.to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for the service
pub type GlueResult<T> = Result<T, GlueError>;

impl From<reqwest::Error> for GlueError {
    fn from(e: reqwest::Error) -> Self {
        GlueError::Transport(e.to_string())
    }
}
