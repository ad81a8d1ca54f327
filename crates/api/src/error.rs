use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use navedit_core::error::CoreError;
use navedit_core::validation::ValidationReport;
use navedit_persistence::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `navedit_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Submitted navigation data failed structural checks.
    #[error("Invalid navigation data")]
    Validation(ValidationReport),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal(error: &dyn std::fmt::Display, context: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %error, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Serialization(err) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
                }
            },

            // Carries the per-field report alongside the usual envelope.
            AppError::Validation(report) => {
                let body = json!({
                    "error": "Invalid navigation data",
                    "code": "VALIDATION_ERROR",
                    "errors": report.errors,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            // --- Storage errors ---
            AppError::Store(StoreError::QuotaExceeded { .. }) => (
                StatusCode::INSUFFICIENT_STORAGE,
                "STORAGE_FULL",
                self.to_string(),
            ),
            AppError::Store(err) => internal(err, "Storage error"),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg, "Internal error"),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
