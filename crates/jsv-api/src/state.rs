//! Shared application state handed to every handler.

use std::sync::Arc;

use jsv_schema::{FsSchemaStore, MemorySchemaStore, SchemaService, SchemaStore};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;

/// Application state. Cloning is cheap; clones share the store.
#[derive(Clone)]
pub struct AppState {
    pub service: SchemaService,
    pub config: AppConfig,
    /// Render handle of the installed Prometheus recorder. `None` disables
    /// the `/metrics` route and the request metrics middleware.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// In-memory state with default configuration and no metrics.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemorySchemaStore::new()))
    }

    /// State backed by the schema directory named in `config`.
    pub fn with_config(config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        let store = FsSchemaStore::new(config.schema_dir.clone());
        Self {
            service: SchemaService::new(Arc::new(store)),
            config,
            metrics,
        }
    }

    /// State over an arbitrary store with default configuration.
    pub fn with_store(store: Arc<dyn SchemaStore>) -> Self {
        Self {
            service: SchemaService::new(store),
            config: AppConfig::default(),
            metrics: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
