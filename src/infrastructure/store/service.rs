//! Key-value store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),
    #[error("Store operation error: {0}")]
    Operation(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait over the key-value store the core consumes.
///
/// All shared state lives behind this trait; the request handlers hold no
/// in-process state between requests, so correctness relies on the
/// backend's per-key atomicity for individual operations. Note that
/// sequences of calls (check-then-set, check-then-decrement) are *not*
/// atomic as a whole.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed store with TTL support
/// - [`crate::infrastructure::store::MemoryStore`] - in-memory store for tests
///   and single-instance development
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieves the value for a key.
    ///
    /// Returns `Ok(None)` when the key does not exist (or has expired).
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores a value under a key with a time-to-live.
    ///
    /// Once the TTL elapses the backend removes the record and the key
    /// becomes available again.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Atomically decrements the integer value of a key by one and returns
    /// the new value.
    ///
    /// An absent key is created at `-1`, matching Redis `DECR` semantics.
    async fn decrement(&self, key: &str) -> StoreResult<i64>;

    /// Returns the remaining time-to-live of a key.
    ///
    /// `Ok(None)` when the key is missing or has no expiry.
    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Checks if the store backend is reachable.
    ///
    /// Used by the health check endpoint.
    async fn health_check(&self) -> bool;
}
