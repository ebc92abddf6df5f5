//! Cache backend implementations.
//!
//! Concrete implementations of `gamestore_core::cache::Cache`, selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory cache guarded by a tokio `RwLock`
//! - `redis`: Redis cache using the redis crate
//!
//! These features are mutually exclusive.

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p gamestore --features memory"
);

// Service tests always run against the in-memory cache.
#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(any(feature = "memory", test))]
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
