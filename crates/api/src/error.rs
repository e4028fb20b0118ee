use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use grassd_core::error::GrassError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`GrassError`] for domain errors and adds transport-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the engine.
    #[error(transparent)]
    Grass(#[from] GrassError),

    /// A malformed request that never reached the engine.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Grass(err) => match err {
                // Client errors: detected before any engine state exists.
                GrassError::InputNotFound { .. } => {
                    (StatusCode::BAD_REQUEST, "INPUT_NOT_FOUND", err.to_string())
                }

                GrassError::MissingParameter { .. } => (
                    StatusCode::BAD_REQUEST,
                    "MISSING_PARAMETER",
                    err.to_string(),
                ),

                // Vector execution is unimplemented by design.
                GrassError::UnsupportedCategory { .. } => (
                    StatusCode::NOT_IMPLEMENTED,
                    "UNSUPPORTED_CATEGORY",
                    err.to_string(),
                ),

                // Module resolution failures are engine faults, not client
                // errors: the catalog is server configuration.
                GrassError::ModuleNotFound { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODULE_NOT_FOUND",
                    err.to_string(),
                ),

                GrassError::EngineInvocation { .. } => {
                    tracing::error!(error = %err, "Engine invocation failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ENGINE_ERROR",
                        err.to_string(),
                    )
                }

                GrassError::Introspection { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTROSPECTION_ERROR",
                    err.to_string(),
                ),

                GrassError::Configuration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    err.to_string(),
                ),

                GrassError::Io(io_err) => {
                    tracing::error!(error = %io_err, "I/O error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
