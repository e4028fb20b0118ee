//! Validated engine configuration.
//!
//! Constructed once at startup by the host (the api crate reads the
//! environment); invalid configuration fails fast and prevents service
//! start.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::GrassError;

/// Env var consulted when no explicit data-store root is configured.
pub const GISDBASE_ENV: &str = "GISDBASE";

/// Validated configuration for the GRASS engine.
#[derive(Debug, Clone)]
pub struct GrassConfig {
    /// GRASS launcher executable, used for location creation.
    pub exe: PathBuf,
    /// Data-store root under which per-job workspaces are created.
    pub dbase: PathBuf,
    /// Module catalog root scanned by the registry. Engine commands are
    /// resolved under this directory too.
    pub modules: PathBuf,
    /// Workspace retention TTL for the reaper; `None` retains workspaces
    /// forever.
    pub workspace_ttl: Option<Duration>,
}

impl GrassConfig {
    /// Build and validate a configuration.
    ///
    /// `exe` defaults to the platform launcher name. `dbase` falls back to
    /// the `GISDBASE` environment variable; if neither is given the service
    /// cannot start.
    pub fn new(
        exe: Option<PathBuf>,
        dbase: Option<PathBuf>,
        modules: PathBuf,
        workspace_ttl: Option<Duration>,
    ) -> Result<Self, GrassError> {
        let exe = exe.unwrap_or_else(|| PathBuf::from(default_exe()));

        let dbase = match dbase {
            Some(d) => d,
            None => std::env::var_os(GISDBASE_ENV)
                .map(PathBuf::from)
                .ok_or_else(|| {
                    GrassError::Configuration(format!(
                        "no GRASS data directory, configure the dbase or set the \
                         {GISDBASE_ENV} environment variable"
                    ))
                })?,
        };

        Ok(Self {
            exe,
            dbase,
            modules,
            workspace_ttl,
        })
    }

    /// Resolve an engine command (a module or a helper like `r.external`)
    /// under the module catalog root.
    pub fn module_path(&self, name: &str) -> PathBuf {
        self.modules.join(name)
    }
}

/// Platform-dependent default launcher name.
fn default_exe() -> &'static str {
    if cfg!(windows) {
        "grass70.bat"
    } else {
        "grass70"
    }
}
