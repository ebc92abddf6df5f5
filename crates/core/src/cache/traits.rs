use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key/value store for serialized snapshots.
///
/// Entries live until the same key is written again, or until `ttl`
/// elapses when one is given.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL, replacing any
    /// previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;
}
