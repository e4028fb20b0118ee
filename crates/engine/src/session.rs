//! Explicit per-job session handles.
//!
//! The upstream engine binds a session to a whole workspace, not to a
//! single call. Instead of initializing ambient process-global session
//! state, a [`Session`] is a plain value created once per job and passed
//! to every subsequent workflow step. Each engine command runs as its own
//! child process with `GISRC` pointing at the session's rc file, so
//! concurrent jobs never share mutable engine state.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use grassd_core::config::GrassConfig;
use grassd_core::error::GrassError;

/// Mapset every job works in. Location creation seeds it with the input
/// raster's coordinate reference metadata.
pub const MAPSET: &str = "PERMANENT";

/// Name of the rc file written inside the workspace directory.
const GISRC_FILE: &str = ".grassrc";

/// A bound execution context targeting one workspace.
#[derive(Debug, Clone)]
pub struct Session {
    gisdbase: PathBuf,
    location: String,
    gisrc: PathBuf,
}

impl Session {
    /// Bind a session to the `location` workspace under the configured
    /// data-store root.
    ///
    /// Writes the rc file that engine commands read via the `GISRC`
    /// environment variable. The workspace directory must already exist
    /// (location creation precedes binding).
    pub async fn bind(config: &GrassConfig, location: &str) -> Result<Self, GrassError> {
        let gisrc = config.dbase.join(location).join(GISRC_FILE);
        let contents = format!(
            "GISDBASE: {}\nLOCATION_NAME: {}\nMAPSET: {}\n",
            config.dbase.display(),
            location,
            MAPSET,
        );
        tokio::fs::write(&gisrc, contents).await?;

        tracing::debug!(location, gisrc = %gisrc.display(), "Session bound");

        Ok(Self {
            gisdbase: config.dbase.clone(),
            location: location.to_string(),
            gisrc,
        })
    }

    /// Workspace (location) name this session targets.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Absolute path of the workspace directory.
    pub fn workspace_path(&self) -> PathBuf {
        self.gisdbase.join(&self.location)
    }

    /// Build a command for `program` that executes inside this session.
    pub fn command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.env("GISRC", &self.gisrc);
        cmd
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
