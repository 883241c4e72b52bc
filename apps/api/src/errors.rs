use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dispatch::DispatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Dispatch(DispatchError::Configuration) => {
                tracing::error!("Analyze request rejected: no API keys configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "API key not configured in server".to_string(),
                )
            }
            AppError::Dispatch(DispatchError::AllCredentialsExhausted {
                attempts,
                last_error,
            }) => {
                tracing::error!("All {attempts} API keys failed: {last_error}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ALL_CREDENTIALS_FAILED",
                    format!("All API keys failed. Last error: {last_error}"),
                )
            }
        };

        // `detail` is what the bundled UI reads to show the failure.
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            },
            "detail": message
        }));

        (status, body).into_response()
    }
}
