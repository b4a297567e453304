use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ferropix_storage::StorageError;
use serde_json::json;
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    Upstream(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => {
                tracing::warn!(key = %key, "object not found");
                Self::NotFound("object not found".to_string())
            }
            StorageError::InvalidPath(msg) => {
                tracing::warn!(error = %msg, "invalid object path");
                Self::BadRequest(msg)
            }
            StorageError::Unavailable(msg) => {
                tracing::error!(error = %msg, "storage unavailable");
                Self::Upstream("storage unavailable".to_string())
            }
            StorageError::Io(err) => {
                tracing::error!(error = %err, "storage IO failure");
                Self::Upstream("storage unavailable".to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
