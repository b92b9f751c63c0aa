//! Redis-backed key-value store implementation.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

/// Redis store implementation.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse: the manager is created once at process start and cloned cheaply
/// per operation, instead of opening a fresh connection per request.
///
/// Each instance scopes its keys under a prefix, so several logical
/// keyspaces (quota counters, link mappings) can share one manager.
pub struct RedisStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// The returned manager is meant to be shared: clone it into one
    /// [`RedisStore::new`] per keyspace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> StoreResult<ConnectionManager> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(manager)
    }

    /// Creates a store over an existing connection manager, scoped to a
    /// key prefix (e.g. `"quota:"` or `"link:"`).
    pub fn new(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Constructs the full Redis key with the keyspace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = self.build_key(key);
        let mut conn = self.conn.clone();

        conn.get::<_, Option<String>>(&key)
            .await
            .map_err(|e| StoreError::Operation(format!("GET {}: {}", key, e)))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let key = self.build_key(key);
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(&key, value, ttl.as_secs())
            .await
            .map_err(|e| StoreError::Operation(format!("SETEX {}: {}", key, e)))
    }

    async fn decrement(&self, key: &str) -> StoreResult<i64> {
        let key = self.build_key(key);
        let mut conn = self.conn.clone();

        conn.decr::<_, _, i64>(&key, 1)
            .await
            .map_err(|e| StoreError::Operation(format!("DECR {}: {}", key, e)))
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let key = self.build_key(key);
        let mut conn = self.conn.clone();

        let secs: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e| StoreError::Operation(format!("TTL {}: {}", key, e)))?;

        // Redis returns -2 for a missing key, -1 for a key without expiry.
        if secs < 0 {
            Ok(None)
        } else {
            Ok(Some(Duration::from_secs(secs as u64)))
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
