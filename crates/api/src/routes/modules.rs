//! Handlers for the `/modules` resource: catalog listing, module
//! introspection, and job submission.
//!
//! Job submission is synchronous: the handler blocks until the engine
//! finishes or fails. There is no queue and no cancellation; a hung engine
//! command holds its connection open.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/modules
///
/// Enumerate the module catalog. Ordering follows filesystem enumeration
/// and is not stable.
async fn list_modules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let list = state.registry.list()?;
    Ok(Json(DataResponse { data: list }))
}

/// GET /api/v1/modules/{name}
///
/// Introspect one module's parameter schema. The schema is descriptive
/// only; the engine validates parameters at run time.
async fn describe_module(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let descriptor = state.registry.describe(&name).await?;
    Ok(Json(DataResponse { data: descriptor }))
}

/// POST /api/v1/modules/{name}/run
///
/// Execute a processing job. The body is the job's parameter map; the
/// `input` key names the source raster file and everything else passes
/// through to the module verbatim.
async fn run_module(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let Value::Object(inputs) = body else {
        return Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    tracing::info!(module = %name, "Job submitted");
    let output = state.runner.run(&name, inputs).await?;

    Ok(Json(DataResponse { data: output }))
}

/// Mount module registry and job routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/modules", get(list_modules))
        .route("/modules/{name}", get(describe_module))
        .route("/modules/{name}/run", post(run_module))
}
