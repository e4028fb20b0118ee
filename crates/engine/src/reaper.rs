//! Periodic cleanup of expired job workspaces.
//!
//! Retention is an explicit policy: without a configured TTL nothing is
//! ever deleted and every workspace is retained, matching the engine's
//! historical behavior. With a TTL, this task scans the data-store root
//! on a fixed interval and removes workspace directories whose
//! modification time has fallen behind the TTL.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;

use grassd_core::config::GrassConfig;

/// How often the reaper scans the data-store root.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the workspace retention loop until `cancel` is triggered.
///
/// Returns immediately when no TTL is configured.
pub async fn run(config: Arc<GrassConfig>, cancel: CancellationToken) {
    let Some(ttl) = config.workspace_ttl else {
        tracing::info!("Workspace reaper disabled, workspaces are retained");
        return;
    };

    tracing::info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Workspace reaper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Workspace reaper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&config.dbase, ttl).await {
                    Ok(removed) if removed > 0 => {
                        tracing::info!(removed, "Workspace reaper: purged expired workspaces");
                    }
                    Ok(_) => tracing::debug!("Workspace reaper: nothing to purge"),
                    Err(e) => tracing::error!(error = %e, "Workspace reaper: sweep failed"),
                }
            }
        }
    }
}

/// Delete workspace directories older than `ttl` under `dbase`.
///
/// Returns how many directories were removed. Entries that vanish or
/// cannot be removed are skipped, not fatal.
async fn sweep(dbase: &Path, ttl: Duration) -> std::io::Result<usize> {
    let cutoff = SystemTime::now() - ttl;
    let mut removed = 0;

    let mut entries = tokio::fs::read_dir(dbase).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_dir() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if modified < cutoff {
            match tokio::fs::remove_dir_all(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Workspace reaper: failed to remove workspace"
                    );
                }
            }
        }
    }

    Ok(removed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
