use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Effective engine configuration, echoed for diagnostics. Paths only;
/// nothing secret lives in the engine configuration.
#[derive(Serialize)]
pub struct ConfigResponse {
    pub exe: String,
    pub dbase: String,
    pub modules: String,
    pub workspace_ttl_secs: Option<u64>,
}

/// GET /api/v1/config -- echo the configuration the engine runs with.
async fn config_echo(State(state): State<AppState>) -> Json<DataResponse<ConfigResponse>> {
    let config = &state.config;
    Json(DataResponse {
        data: ConfigResponse {
            exe: config.exe.display().to_string(),
            dbase: config.dbase.display().to_string(),
            modules: config.modules.display().to_string(),
            workspace_ttl_secs: config.workspace_ttl.map(|ttl| ttl.as_secs()),
        },
    })
}

/// Mount the configuration echo route.
pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(config_echo))
}
