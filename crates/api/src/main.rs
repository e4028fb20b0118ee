use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grassd_api::config::{self, ServerConfig};
use grassd_api::router::build_app_router;
use grassd_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "grassd_api=debug,grassd_engine=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let server_config = ServerConfig::from_env();
    let grass_config = config::grass_config_from_env().expect("Invalid GRASS configuration");
    tracing::info!(
        exe = %grass_config.exe.display(),
        dbase = %grass_config.dbase.display(),
        modules = %grass_config.modules.display(),
        "Loaded GRASS configuration"
    );

    // --- App state ---
    let state = AppState::new(grass_config);

    // --- Workspace reaper (no-op unless a TTL is configured) ---
    let reaper_cancel = CancellationToken::new();
    let reaper_handle = tokio::spawn(grassd_engine::reaper::run(
        Arc::clone(&state.config),
        reaper_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &server_config);

    // --- Start server ---
    let addr = SocketAddr::new(
        server_config.host.parse().expect("Invalid HOST address"),
        server_config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    reaper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reaper_handle).await;
    tracing::info!("Workspace reaper stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
