//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PasswordService, Repositories, TokenService};
use scribe_core::services::Services;
#[cfg(feature = "postgres")]
use scribe_infra::DatabasePool;
use scribe_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

/// Where the repositories keep their data.
#[derive(Clone)]
pub enum Storage {
    #[cfg(feature = "postgres")]
    Postgres(DatabasePool),
    InMemory,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub tokens: Arc<dyn TokenService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let (repos, storage) = Self::connect(config).await;

        tracing::info!("Application state initialized");
        Self::with_services(Services::new(repos, passwords), tokens, storage)
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> (Repositories, Storage) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (InMemoryStore::new().repositories(), Storage::InMemory);
        };

        match DatabasePool::init(db_config).await {
            Ok(pool) => (pool.repositories(), Storage::Postgres(pool)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (InMemoryStore::new().repositories(), Storage::InMemory)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> (Repositories, Storage) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (InMemoryStore::new().repositories(), Storage::InMemory)
    }

    pub fn with_services(
        services: Services,
        tokens: Arc<dyn TokenService>,
        storage: Storage,
    ) -> Self {
        Self {
            services,
            tokens,
            storage,
        }
    }

    /// Database status for the health endpoint.
    pub async fn storage_status(&self) -> &'static str {
        match &self.storage {
            #[cfg(feature = "postgres")]
            Storage::Postgres(pool) => match pool.ping().await {
                Ok(()) => "connected",
                Err(e) => {
                    tracing::warn!(error = %e, "Database ping failed");
                    "unavailable"
                }
            },
            Storage::InMemory => "in-memory",
        }
    }
}
