use crate::services::gateway::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("{action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    pub fn storage(action: &'static str) -> impl FnOnce(StorageError) -> AppError {
        move |source| AppError::Storage { action, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Storage { action, source } => {
                tracing::error!("{}: {:?}", action, source);
                let detail = match source {
                    StorageError::Backend { code, .. } => format!("{}: {}", action, code),
                    StorageError::Unexpected(msg) => {
                        format!("An unexpected error occurred: {}", msg)
                    }
                };
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "detail": detail,
        }));

        (status, body).into_response()
    }
}
