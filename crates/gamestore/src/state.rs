//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Services hold repository and cache trait objects, and
//! the concrete backends are chosen via feature flags.

use std::sync::Arc;

use gamestore_auth::{AuthConfig, AuthState};
use gamestore_core::cache::Cache;
use gamestore_core::storage::Repository;
use gamestore_core::store::{Company, Device, User};

use crate::config::Config;
use crate::rate_limit::RateLimiter;
use crate::services::{
    CompanyService, DeviceService, FsPictureStore, PictureStore, UserService,
};

/// Shared application state.
///
/// Cloned for each request handler. Everything behind it is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<CompanyService>,
    /// Device service, reads go through the cache.
    pub devices: Arc<DeviceService>,
    pub users: Arc<UserService>,
    /// Picture files, read directly by the picture endpoint.
    pub pictures: Arc<dyn PictureStore>,
    pub auth: AuthState,
    /// Single bucket shared by every request under `/api`.
    pub rate_limiter: Arc<RateLimiter>,
    pub storage_backend: &'static str,
    pub cache_backend: &'static str,
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

/// Repositories for every entity, from a single storage backend.
struct Repositories {
    companies: Arc<dyn Repository<Company>>,
    devices: Arc<dyn Repository<Device>>,
    users: Arc<dyn Repository<User>>,
    backend: &'static str,
}

impl AppState {
    fn build(
        repositories: Repositories,
        cache: Arc<dyn Cache>,
        cache_backend: &'static str,
        config: &Config,
        auth: AuthConfig,
    ) -> Self {
        let auth = AuthState::new(auth);
        let pictures: Arc<dyn PictureStore> =
            Arc::new(FsPictureStore::new(config.pictures_dir.clone()));

        let companies = CompanyService::new(
            repositories.companies.clone(),
            repositories.devices.clone(),
            pictures.clone(),
        );
        let devices = DeviceService::new(
            repositories.devices,
            repositories.companies,
            cache,
            config.cache_ttl(),
        );
        let users = UserService::new(
            repositories.users,
            pictures.clone(),
            (*auth.tokens).clone(),
        );

        Self {
            companies: Arc::new(companies),
            devices: Arc::new(devices),
            users: Arc::new(users),
            pictures,
            auth,
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit())),
            storage_backend: repositories.backend,
            cache_backend,
        }
    }

    /// Seeds the demo admin, companies and devices.
    pub async fn with_demo_data(self) -> Result<Self, anyhow::Error> {
        crate::mock_data::seed(&self).await?;
        Ok(self)
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(feature = "inmemory")]
fn inmemory_repositories() -> Repositories {
    use crate::storage::InMemoryRepository;

    Repositories {
        companies: Arc::new(InMemoryRepository::<Company>::new()),
        devices: Arc::new(InMemoryRepository::<Device>::new()),
        users: Arc::new(InMemoryRepository::<User>::new()),
        backend: "inmemory",
    }
}

#[cfg(feature = "sqlite")]
async fn sqlite_repositories(config: &Config) -> Result<Repositories, anyhow::Error> {
    use crate::storage::SqliteRepository;

    let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
    tracing::info!(path = %config.sqlite_path, "Opened SQLite database");

    Ok(Repositories {
        companies: sqlite_repo.clone(),
        devices: sqlite_repo.clone(),
        users: sqlite_repo,
        backend: "sqlite",
    })
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Nothing is persisted across restarts.
        pub async fn new(config: &Config, auth: AuthConfig) -> Result<Self, anyhow::Error> {
            let cache = Arc::new(MemoryCache::new());
            Ok(Self::build(
                inmemory_repositories(),
                cache,
                "memory",
                config,
                auth,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config, auth: AuthConfig) -> Result<Self, anyhow::Error> {
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            Ok(Self::build(
                inmemory_repositories(),
                cache,
                "redis",
                config,
                auth,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config, auth: AuthConfig) -> Result<Self, anyhow::Error> {
            let repositories = sqlite_repositories(config).await?;
            let cache = Arc::new(MemoryCache::new());
            Ok(Self::build(repositories, cache, "memory", config, auth))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config, auth: AuthConfig) -> Result<Self, anyhow::Error> {
            let repositories = sqlite_repositories(config).await?;
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            Ok(Self::build(repositories, cache, "redis", config, auth))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================
