//! Application error type mapping to HTTP status codes.
//!
//! Error bodies use a `{"detail": "..."}` envelope, matching what the
//! embed script expects from validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use sitevoice_types::error::MemoryError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Validation error (missing message, missing site id).
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<MemoryError> for AppError {
    fn from(e: MemoryError) -> Self {
        match e {
            MemoryError::InvalidInput(msg) => AppError::Validation(msg),
            MemoryError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(%msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_validation() {
        let err = AppError::from(MemoryError::InvalidInput("Message is required".to_string()));
        assert!(matches!(err, AppError::Validation(msg) if msg == "Message is required"));
    }

    #[test]
    fn test_storage_maps_to_internal() {
        let err = AppError::from(MemoryError::Storage("disk full".to_string()));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
