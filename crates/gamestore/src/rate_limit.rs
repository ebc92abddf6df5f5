//! Token-bucket rate limiting for the API.
//!
//! One bucket is shared by every request. Each request takes a token;
//! `tokens_per_period` tokens come back after each full replenishment
//! period, up to `token_limit`. An empty bucket rejects with 429.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

/// Body of every rejected request.
pub const REJECTION_MESSAGE: &str = "Too many requests. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub token_limit: u32,
    pub tokens_per_period: u32,
    pub replenishment_period: Duration,
}

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Creates a limiter with a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    fn starting_at(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            config,
            bucket: Mutex::new(Bucket {
                tokens: config.token_limit,
                last_refill: now,
            }),
        }
    }

    /// Takes a token if one is available.
    pub async fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now()).await
    }

    async fn try_acquire_at(&self, now: Instant) -> bool {
        let mut bucket = self.bucket.lock().await;
        self.replenish(&mut bucket, now);

        if bucket.tokens == 0 {
            return false;
        }
        bucket.tokens -= 1;
        true
    }

    /// Adds tokens for every full period since the last refill.
    fn replenish(&self, bucket: &mut Bucket, now: Instant) {
        let period = self.config.replenishment_period;
        if period.is_zero() {
            bucket.tokens = self.config.token_limit;
            bucket.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(bucket.last_refill);
        let periods = (elapsed.as_nanos() / period.as_nanos()) as u32;
        if periods == 0 {
            return;
        }

        let added = periods.saturating_mul(self.config.tokens_per_period);
        bucket.tokens = bucket
            .tokens
            .saturating_add(added)
            .min(self.config.token_limit);
        bucket.last_refill += period * periods;
    }
}

/// Middleware that rejects requests once the bucket is empty.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire().await {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Request rejected by rate limiter");
    (StatusCode::TOO_MANY_REQUESTS, REJECTION_MESSAGE).into_response()
}
