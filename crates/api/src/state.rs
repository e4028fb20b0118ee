use std::sync::Arc;

use grassd_core::config::GrassConfig;
use grassd_engine::registry::ModuleRegistry;
use grassd_engine::runner::JobRunner;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: the registry and runner share the configuration
/// behind an `Arc` and hold no mutable state of their own.
#[derive(Clone)]
pub struct AppState {
    /// Validated engine configuration.
    pub config: Arc<GrassConfig>,
    /// Module catalog view (list + describe).
    pub registry: ModuleRegistry,
    /// Job execution engine.
    pub runner: JobRunner,
}

impl AppState {
    pub fn new(config: GrassConfig) -> Self {
        let config = Arc::new(config);
        let registry = ModuleRegistry::new(Arc::clone(&config));
        let runner = JobRunner::new(Arc::clone(&config), registry.clone());
        Self {
            config,
            registry,
            runner,
        }
    }
}
