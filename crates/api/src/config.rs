use std::path::PathBuf;
use std::time::Duration;

use grassd_core::config::GrassConfig;
use grassd_core::error::GrassError;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load server configuration from environment variables with defaults.
    ///
    /// | Env Var        | Default                 |
    /// |----------------|-------------------------|
    /// | `HOST`         | `0.0.0.0`               |
    /// | `PORT`         | `8000`                  |
    /// | `CORS_ORIGINS` | `http://localhost:5173` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
        }
    }
}

/// Load the engine configuration from environment variables.
///
/// | Env Var                    | Meaning                       | Default            |
/// |----------------------------|-------------------------------|--------------------|
/// | `GRASS_EXE`                | GRASS launcher executable     | platform launcher  |
/// | `GRASS_DBASE`              | data-store root               | `GISDBASE` env var |
/// | `GRASS_MODULES`            | module catalog root           | required           |
/// | `GRASS_WORKSPACE_TTL_SECS` | workspace retention TTL       | unset (retain all) |
///
/// Fails with a configuration error when the module root is missing or no
/// data-store root can be resolved; the service must not start without
/// them.
pub fn grass_config_from_env() -> Result<GrassConfig, GrassError> {
    let exe = std::env::var_os("GRASS_EXE").map(PathBuf::from);
    let dbase = std::env::var_os("GRASS_DBASE").map(PathBuf::from);
    let modules = std::env::var_os("GRASS_MODULES")
        .map(PathBuf::from)
        .ok_or_else(|| {
            GrassError::Configuration(
                "GRASS_MODULES must be set to the module catalog root".to_string(),
            )
        })?;
    let workspace_ttl = std::env::var("GRASS_WORKSPACE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs);

    GrassConfig::new(exe, dbase, modules, workspace_ttl)
}
