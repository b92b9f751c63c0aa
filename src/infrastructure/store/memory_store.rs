//! In-memory key-value store for tests and single-instance development.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry {
    value: String,
    /// `None` means no expiry (a key created by `decrement`).
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// A store implementation backed by a process-local map.
///
/// Expiry is lazy: records past their deadline are dropped on the next
/// access to their key. TTL and DECR semantics mirror Redis so the quota
/// guard and shortener behave identically against either backend.
///
/// # Use Cases
///
/// - Integration tests without a Redis instance
/// - Development environments where Redis is not configured
///
/// Not suitable for multi-instance deployments: state is per process.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Removes the entry if it has expired, then returns whether a live
    /// entry remains. Callers must hold the lock.
    fn prune(entries: &mut HashMap<String, Entry>, key: &str) {
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        Self::prune(&mut entries, key);
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                // A deadline past what Instant can represent means the
                // entry effectively never expires.
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn decrement(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.lock().await;
        Self::prune(&mut entries, key);

        match entries.get_mut(key) {
            Some(entry) => {
                let current: i64 = entry.value.parse().map_err(|_| {
                    StoreError::Operation(format!("DECR {}: value is not an integer", key))
                })?;
                let next = current - 1;
                entry.value = next.to_string();
                Ok(next)
            }
            None => {
                // Redis DECR creates the key at -1, without an expiry.
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: "-1".to_string(),
                        expires_at: None,
                    },
                );
                Ok(-1)
            }
        }
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut entries = self.entries.lock().await;
        Self::prune(&mut entries, key);

        let now = Instant::now();
        Ok(entries
            .get(key)
            .and_then(|e| e.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now)))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
