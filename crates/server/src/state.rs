//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{AdminRepository, LeadRepository, PgAdminRepository, PgLeadRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the repositories.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    leads: Arc<dyn LeadRepository>,
    admins: Arc<dyn AdminRepository>,
}

impl AppState {
    /// Create application state backed by `PostgreSQL`.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self::with_repositories(
            config,
            Arc::new(PgLeadRepository::new(pool.clone())),
            Arc::new(PgAdminRepository::new(pool)),
        )
    }

    /// Create application state from arbitrary repository implementations.
    #[must_use]
    pub fn with_repositories(
        config: ServerConfig,
        leads: Arc<dyn LeadRepository>,
        admins: Arc<dyn AdminRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                leads,
                admins,
            }),
        }
    }

    /// Create application state with fresh in-memory repositories.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        use crate::db::memory::{InMemoryAdminRepository, InMemoryLeadRepository};

        Self::with_repositories(
            config,
            Arc::new(InMemoryLeadRepository::new()),
            Arc::new(InMemoryAdminRepository::new()),
        )
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the lead repository.
    #[must_use]
    pub fn leads(&self) -> &dyn LeadRepository {
        self.inner.leads.as_ref()
    }

    /// Get the admin repository.
    #[must_use]
    pub fn admins(&self) -> &dyn AdminRepository {
        self.inner.admins.as_ref()
    }
}
