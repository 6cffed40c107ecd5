//! Shared application state for the Axum API server.

use std::sync::Arc;

use pushbell_common::config::AppConfig;
use pushbell_engine::backend::{Backend, LazyBackend};

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<LazyBackend>,
}

impl AppState {
    /// Clients are built on first use, not here.
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);
        Self {
            backend: Arc::new(LazyBackend::new(config.clone())),
            config,
        }
    }

    /// State whose backend is already initialised, e.g. with test doubles.
    pub fn with_backend(config: AppConfig, backend: Backend) -> Self {
        let config = Arc::new(config);
        Self {
            backend: Arc::new(LazyBackend::ready(config.clone(), backend)),
            config,
        }
    }
}
