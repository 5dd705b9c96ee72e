//! API Error Handling
//!
//! Transport-level failures only. A render that fails is still a 200 with a
//! failure body; these errors cover the cases where no result exists at all.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            ApiError::InternalError("Render task panicked".to_string())
        } else {
            ApiError::InternalError(format!("Render task failed: {}", err))
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
