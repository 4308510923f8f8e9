use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use charsheet_core::StoreError;
use charsheet_engine::{FailureCause, GenerationError};

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as `{ "ok": false, "error": ... }` plus
/// variant-specific fields.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Generation(GenerationError::BadRequest(msg)) => {
                tracing::debug!(error = %msg, "unparseable request body");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "ok": false, "error": "Invalid JSON body" }),
                )
            }
            AppError::Generation(GenerationError::InvalidInput(errs)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "ok": false,
                    "error": "Validation error",
                    "details": errs.flatten(),
                }),
            ),
            AppError::Generation(GenerationError::GenerationFailed(cause)) => {
                let status = match cause {
                    FailureCause::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    FailureCause::Rejected(_) | FailureCause::NonConforming(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                tracing::error!(cause = cause.as_str(), error = %cause, "generation failed");
                (
                    status,
                    json!({
                        "ok": false,
                        "error": "Generation failed",
                        "cause": cause.as_str(),
                        "retryable": cause.is_retryable(),
                    }),
                )
            }
            AppError::Store(err) => {
                let status = match err {
                    StoreError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
                    StoreError::NotFound(_) | StoreError::Io { .. } => StatusCode::NOT_FOUND,
                    StoreError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                tracing::warn!(error = %err, "profile store error");
                (
                    status,
                    json!({ "ok": false, "error": err.display_message() }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "ok": false, "error": "An internal error occurred" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
