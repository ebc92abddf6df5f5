//! Redis cache backend for multi-instance deployments.

mod cache;

pub use cache::RedisCache;
