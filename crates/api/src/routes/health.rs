use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the data-store root is visible on disk.
    pub dbase_ok: bool,
}

/// GET /health -- service health and data-store visibility.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let dbase_ok = state.config.dbase.is_dir();

    let status = if dbase_ok { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        dbase_ok,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
