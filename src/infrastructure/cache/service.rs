//! Cache service trait and error types.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key for a restaurant lookup by id.
pub fn restaurant_key(id: i64) -> String {
    format!("restaurant:{id}")
}

/// Delay before a restaurant entry is invalidated a second time.
///
/// Covers a lookup that read the row before a review committed and writes its
/// snapshot after the first invalidation.
pub const REINVALIDATE_DELAY: Duration = Duration::from_millis(500);

/// Drops the cached restaurant now and again after [`REINVALIDATE_DELAY`].
pub async fn invalidate_restaurant(cache: &Arc<dyn CacheService>, id: i64) {
    let key = restaurant_key(id);
    if let Err(e) = cache.invalidate(&key).await {
        tracing::warn!(error = ?e, %key, "Failed to invalidate restaurant cache");
    }

    let cache = cache.clone();
    tokio::spawn(async move {
        tokio::time::sleep(REINVALIDATE_DELAY).await;
        if let Err(e) = cache.invalidate(&key).await {
            tracing::warn!(error = ?e, %key, "Failed to re-invalidate restaurant cache");
        }
    });
}

/// Trait for caching serialized lookups.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures should degrade to database lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached JSON value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(json))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a JSON value with optional TTL.
    ///
    /// # Arguments
    ///
    /// - `key` - cache key, see [`restaurant_key`]
    /// - `value` - serialized payload
    /// - `ttl_seconds` - TTL in seconds (implementation default if `None`)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached entry. Used after a review changes the aggregate rating.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
