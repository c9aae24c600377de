//! Token bucket rate limiter middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::http::header::RETRY_AFTER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use codedrop_core::error::AppError;

use crate::error::ApiError;

/// Buckets tracked before idle (full) ones are evicted.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Simple in-memory token bucket rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Client key → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self, now: Instant, max_tokens: f64, refill_rate: f64) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(max_tokens);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens,
            refill_rate,
        }
    }

    /// Attempts to consume a token for `key`. On refusal, returns how long
    /// until the next token is available.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        let max_tokens = self.max_tokens as f64;

        if buckets.len() >= MAX_TRACKED_CLIENTS && !buckets.contains_key(key) {
            let refill_rate = self.refill_rate;
            buckets.retain(|_, bucket| {
                bucket.refill(now, max_tokens, refill_rate);
                bucket.tokens < max_tokens
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: max_tokens,
            last_refill: now,
        });
        bucket.refill(now, max_tokens, self.refill_rate);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_rate))
        }
    }
}

/// Rejects requests from clients that have exhausted their bucket.
///
/// Clients are keyed by peer IP; requests without connection info share
/// one bucket.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&key).await {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            tracing::debug!(client = %key, "Redemption rate limit exceeded");
            let mut response =
                ApiError(AppError::rate_limited("Too many attempts, please slow down"))
                    .into_response();
            let retry_after = wait.as_secs_f64().ceil().max(1.0) as u64;
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
    }
}
