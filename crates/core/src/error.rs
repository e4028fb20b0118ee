use crate::module::ModuleCategory;

/// Error taxonomy for the grassd service.
///
/// Errors are raised at the point of detection and propagate unhandled to
/// the transport layer; there are no retries and no partial recovery. A
/// failed job leaves its workspace and any partial artifacts in place.
#[derive(Debug, thiserror::Error)]
pub enum GrassError {
    /// Required configuration missing or invalid at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested module could not be resolved under the module root.
    #[error("Module not found: {name}")]
    ModuleNotFound { name: String },

    /// The named input raster file does not exist on the local filesystem.
    #[error("Raster file {path} does not exist")]
    InputNotFound { path: String },

    /// The job parameter map lacks a required key.
    #[error("Required parameter {name} is missing")]
    MissingParameter { name: String },

    /// The module's category has no execution path. Only raster modules
    /// can be run; vector execution is unimplemented by design.
    #[error("Module {name} has category {category}, only raster modules can be run")]
    UnsupportedCategory {
        name: String,
        category: ModuleCategory,
    },

    /// An external engine command exited non-zero at some workflow step.
    #[error("Failed to run command {command}: {stderr}")]
    EngineInvocation { command: String, stderr: String },

    /// The module's interface description could not be parsed.
    #[error("Malformed interface description for {name}: {message}")]
    Introspection { name: String, message: String },

    /// An I/O error while spawning a command or touching the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
