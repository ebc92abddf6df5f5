//! In-memory cache implementation.
//!
//! Entries stay until the same key is written again. An entry written with
//! a TTL reads as absent once the TTL has passed; expired entries are not
//! swept, only replaced on the next write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use gamestore_core::cache::{Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe in-memory cache using `Arc<RwLock<HashMap>>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => Ok(None),
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache.set("device:1", b"{\"id\":1}", None).await.unwrap();

        assert_eq!(
            cache.get("device:1").await.unwrap(),
            Some(b"{\"id\":1}".to_vec())
        );
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("device:404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let cache = MemoryCache::new();

        cache.set("devices:all", b"[]", None).await.unwrap();
        cache.set("devices:all", b"[1]", None).await.unwrap();

        assert_eq!(cache.get("devices:all").await.unwrap(), Some(b"[1]".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_entry_without_ttl_does_not_expire() {
        let cache = MemoryCache::new();

        cache.set("device:1", b"x", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get("device:1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let cache = MemoryCache::new();

        cache
            .set("device:1", b"x", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("device:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = MemoryCache::new();
        let clone = cache.clone();

        cache.set("device:2", b"y", None).await.unwrap();

        assert_eq!(clone.get("device:2").await.unwrap(), Some(b"y".to_vec()));
    }
}
