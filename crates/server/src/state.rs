//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::VistaproConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone: the inner data sits behind an `Arc`. The pool handle is
/// created once at startup and travels through this state into repositories;
/// there is no module-level pool anywhere.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: VistaproConfig,
    pool: PgPool,
}

impl AppState {
    /// Build the application state.
    #[must_use]
    pub fn new(config: VistaproConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &VistaproConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }
}
