pub mod config;
pub mod health;
pub mod modules;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(config::router())
        .merge(modules::router())
}
