//! Job execution workflow.
//!
//! A job walks `Validated -> WorkspaceCreated -> SessionBound -> Imported
//! -> Processed -> Exported`; any external-command failure drops it
//! straight to failed. There is no rollback and no retry: a failed job
//! leaves its workspace and partial artifacts behind for inspection (the
//! reaper applies the retention policy), and the caller may simply
//! resubmit, producing a fresh workspace.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use grassd_core::config::GrassConfig;
use grassd_core::error::GrassError;
use grassd_core::module::ModuleCategory;
use grassd_core::token;

use crate::command;
use crate::registry::ModuleRegistry;
use crate::session::Session;

/// Key in the job parameter map naming the source raster file. Removed
/// before the remaining parameters are passed through to the module.
pub const INPUT_KEY: &str = "input";

/// Conventional name of the imported input layer.
pub const IN_LAYER: &str = "in_raster";

/// Conventional name of the module's output layer.
pub const OUT_LAYER: &str = "out_raster";

/// Engine command that links a raster file into the workspace as a
/// virtual layer.
const IMPORT_MODULE: &str = "r.external";

/// Engine command that exports a layer to a portable format.
const EXPORT_MODULE: &str = "r.out.gdal";

/// Exported artifact filename inside the per-job output directory.
const RESULT_FILE: &str = "result.tif";

/// How many workspace tokens to try before giving up on collisions.
const TOKEN_ATTEMPTS: usize = 5;

/// Artifact handle returned by a successful job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutput {
    /// Path of the exported GeoTIFF.
    pub output: PathBuf,
}

/// Executes processing jobs against the external engine.
///
/// Cheaply cloneable; all state is shared configuration. Jobs are
/// ephemeral: nothing is persisted, queued, or retried.
#[derive(Clone)]
pub struct JobRunner {
    config: Arc<GrassConfig>,
    registry: ModuleRegistry,
}

impl JobRunner {
    pub fn new(config: Arc<GrassConfig>, registry: ModuleRegistry) -> Self {
        Self { config, registry }
    }

    /// Run a job: classify the requested module, then execute the raster
    /// workflow.
    ///
    /// Vector modules (and anything else the first-character convention
    /// yields) fail with [`GrassError::UnsupportedCategory`] before any
    /// workspace is created or engine command is run.
    pub async fn run(
        &self,
        name: &str,
        inputs: Map<String, Value>,
    ) -> Result<JobOutput, GrassError> {
        let descriptor = self.registry.describe(name).await?;
        match descriptor.category {
            ModuleCategory::Raster => {
                let output = self.run_raster(name, inputs).await?;
                Ok(JobOutput { output })
            }
            category => Err(GrassError::UnsupportedCategory {
                name: name.to_string(),
                category,
            }),
        }
    }

    /// Execute the raster workflow for an already-classified module.
    async fn run_raster(
        &self,
        name: &str,
        mut inputs: Map<String, Value>,
    ) -> Result<PathBuf, GrassError> {
        // Validate the source raster before creating any state.
        let raster_file = match inputs.remove(INPUT_KEY) {
            Some(value) => value_to_arg(&value),
            None => {
                return Err(GrassError::MissingParameter {
                    name: INPUT_KEY.to_string(),
                })
            }
        };
        if !std::path::Path::new(&raster_file).exists() {
            return Err(GrassError::InputNotFound { path: raster_file });
        }

        // Allocate a fresh workspace name under the data-store root.
        let (workspace, workspace_path) = self.allocate_workspace()?;
        tracing::info!(module = name, workspace = %workspace, raster = %raster_file, "Job validated");

        // Create the location from the raster's CRS metadata.
        let mut create = tokio::process::Command::new(&self.config.exe);
        create.arg("-c").arg(&raster_file).arg("-e").arg(&workspace_path);
        command::run_checked(&mut create).await?;
        tracing::info!(workspace = %workspace, "Workspace created");

        // Bind the session; every later step takes it explicitly.
        let session = Session::bind(&self.config, &workspace).await?;
        tracing::info!(workspace = %workspace, "Session bound");

        // Link the raster in as a virtual layer.
        let mut import = session.command(&self.config.module_path(IMPORT_MODULE));
        import
            .arg(format!("{INPUT_KEY}={raster_file}"))
            .arg(format!("output={IN_LAYER}"));
        command::run_checked(&mut import).await?;
        tracing::info!(workspace = %workspace, layer = IN_LAYER, "Input imported");

        // Run the module; remaining caller parameters pass through
        // verbatim. The engine is the sole authority on their validity.
        let mut process = session.command(&self.config.module_path(name));
        process
            .arg(format!("{INPUT_KEY}={IN_LAYER}"))
            .arg(format!("output={OUT_LAYER}"));
        for (key, value) in &inputs {
            process.arg(format!("{key}={}", value_to_arg(value)));
        }
        command::run_checked(&mut process).await?;
        tracing::info!(workspace = %workspace, module = name, "Module processed");

        // Export the result into a fresh directory that outlives the job.
        let out_dir = tempfile::tempdir()?.keep();
        let result_file = out_dir.join(RESULT_FILE);
        let mut export = session.command(&self.config.module_path(EXPORT_MODULE));
        export
            .arg(format!("{INPUT_KEY}={OUT_LAYER}"))
            .arg(format!("output={}", result_file.display()))
            .arg("format=GTiff");
        command::run_checked(&mut export).await?;
        tracing::info!(workspace = %workspace, output = %result_file.display(), "Result exported");

        Ok(result_file)
    }

    /// Pick an unused workspace token under the data-store root.
    ///
    /// The token space makes collisions improbable; the existence check
    /// turns "improbable" into "handled".
    fn allocate_workspace(&self) -> Result<(String, PathBuf), GrassError> {
        for _ in 0..TOKEN_ATTEMPTS {
            let workspace = token::workspace_token();
            let path = self.config.dbase.join(&workspace);
            if !path.exists() {
                return Ok((workspace, path));
            }
        }
        Err(GrassError::Io(std::io::Error::other(format!(
            "no free workspace name after {TOKEN_ATTEMPTS} attempts"
        ))))
    }
}

/// Render a JSON parameter value as a command-line argument.
///
/// Strings are used as-is; other scalars use their JSON rendering.
fn value_to_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
