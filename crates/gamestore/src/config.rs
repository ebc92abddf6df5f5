use std::{env, path::PathBuf, time::Duration};

use crate::rate_limit::RateLimitConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: unset, entries never expire)
    pub cache_ttl_seconds: Option<u64>,
    /// Path to SQLite database file (default: "gamestore.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Directory holding uploaded pictures (default: "pictures")
    pub pictures_dir: PathBuf,
    /// Maximum number of tokens in the rate limit bucket (default: 100)
    pub rate_limit_token_limit: u32,
    /// Tokens added per replenishment period (default: 10)
    pub rate_limit_tokens_per_period: u32,
    /// Replenishment period in seconds (default: 10)
    pub rate_limit_replenishment_seconds: u64,
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: no TTL)
    /// - `SQLITE_PATH` - SQLite database path (default: "gamestore.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `PICTURES_DIR` - Picture storage directory (default: "pictures")
    /// - `RATE_LIMIT_TOKEN_LIMIT` - Bucket size (default: 100)
    /// - `RATE_LIMIT_TOKENS_PER_PERIOD` - Tokens added per period (default: 10)
    /// - `RATE_LIMIT_REPLENISHMENT_SECONDS` - Period length (default: 10)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS"),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "gamestore.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            pictures_dir: env::var("PICTURES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("pictures")),
            rate_limit_token_limit: parse_env("RATE_LIMIT_TOKEN_LIMIT").unwrap_or(100),
            rate_limit_tokens_per_period: parse_env("RATE_LIMIT_TOKENS_PER_PERIOD").unwrap_or(10),
            rate_limit_replenishment_seconds: parse_env("RATE_LIMIT_REPLENISHMENT_SECONDS")
                .unwrap_or(10),
        }
    }

    /// Get cache TTL as a Duration, if one is configured.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_seconds.map(Duration::from_secs)
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            token_limit: self.rate_limit_token_limit,
            tokens_per_period: self.rate_limit_tokens_per_period,
            replenishment_period: Duration::from_secs(self.rate_limit_replenishment_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
