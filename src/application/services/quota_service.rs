//! Per-client request quota tracking (the quota guard).

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::store::KeyValueStore;

/// Outcome of a quota check.
#[derive(Debug, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Quota remains; the request may proceed. The counter is only
    /// decremented after the shortener succeeds, via [`QuotaService::consume`].
    Allowed,
    /// Quota exhausted for the current window.
    Denied {
        /// Whole minutes until the window resets (floor).
        reset_minutes: u64,
    },
}

/// Quota state reported back to the client after a successful request.
#[derive(Debug)]
pub struct QuotaState {
    /// Remaining requests in the window. Can briefly go negative under
    /// concurrent requests from the same client; the check and the
    /// decrement are separate store operations.
    pub remaining: i64,
    /// Whole minutes until the window resets (floor).
    pub reset_minutes: u64,
}

/// Tracks remaining requests per client identity in the key-value store.
///
/// Each client gets a counter seeded at the configured ceiling with the
/// quota-window TTL; once it reaches zero, requests are denied until the
/// record expires and the next request re-creates it fresh.
///
/// Store reads are fail-open: a read error is treated as "no record" so a
/// transiently unreadable store does not block traffic. Writes on this
/// path (seeding the counter, decrementing) are best-effort and only
/// logged on failure; the shortener's own persistence is where write
/// failures become fatal.
pub struct QuotaService {
    store: Arc<dyn KeyValueStore>,
    ceiling: u32,
    window: Duration,
}

impl QuotaService {
    pub fn new(store: Arc<dyn KeyValueStore>, ceiling: u32, window: Duration) -> Self {
        Self {
            store,
            ceiling,
            window,
        }
    }

    /// Checks whether a client may shorten a URL right now.
    ///
    /// First sight of a client creates its counter at the ceiling with the
    /// window TTL. A counter at or below zero denies the request and
    /// reports the remaining window in whole minutes.
    pub async fn check_and_reserve(&self, client_id: &str) -> QuotaDecision {
        let value = match self.store.get(client_id).await {
            Ok(value) => value,
            Err(e) => {
                // Fail-open: an unreadable store must not block traffic.
                tracing::warn!(client_id, error = %e, "quota read failed, allowing request");
                None
            }
        };

        match value {
            None => {
                if let Err(e) = self
                    .store
                    .set(client_id, &self.ceiling.to_string(), self.window)
                    .await
                {
                    tracing::warn!(client_id, error = %e, "failed to seed quota counter");
                }
                QuotaDecision::Allowed
            }
            Some(raw) => {
                let remaining: i64 = raw.parse().unwrap_or(0);
                if remaining <= 0 {
                    QuotaDecision::Denied {
                        reset_minutes: self.reset_minutes(client_id).await,
                    }
                } else {
                    QuotaDecision::Allowed
                }
            }
        }
    }

    /// Consumes one unit of quota after a successful shorten and reports
    /// the updated state for the response.
    ///
    /// If the client's record expired between the check and this call, the
    /// decrement re-creates the key without a TTL. Left alone that counter
    /// would sit below zero forever and lock the client out, so the window
    /// TTL is re-applied when the post-decrement key has none.
    ///
    /// Errors here are logged and degrade to zeroed fields rather than
    /// failing a request whose mapping is already persisted.
    pub async fn consume(&self, client_id: &str) -> QuotaState {
        let remaining = match self.store.decrement(client_id).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(client_id, error = %e, "quota decrement failed");
                0
            }
        };

        let reset_minutes = match self.store.ttl(client_id).await {
            Ok(Some(ttl)) => ttl.as_secs() / 60,
            Ok(None) => {
                // Record expired mid-request and the decrement re-created it
                // TTL-less; re-arm the window so the counter still expires.
                if let Err(e) = self
                    .store
                    .set(client_id, &remaining.to_string(), self.window)
                    .await
                {
                    tracing::warn!(client_id, error = %e, "failed to re-arm quota window");
                }
                self.window.as_secs() / 60
            }
            Err(e) => {
                tracing::warn!(client_id, error = %e, "quota TTL read failed");
                0
            }
        };

        QuotaState {
            remaining,
            reset_minutes,
        }
    }

    /// Remaining window TTL in whole minutes (floor), 0 on any error.
    async fn reset_minutes(&self, client_id: &str) -> u64 {
        match self.store.ttl(client_id).await {
            Ok(Some(ttl)) => ttl.as_secs() / 60,
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(client_id, error = %e, "quota TTL read failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::MemoryStore;

    fn service(ceiling: u32, window: Duration) -> (QuotaService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            QuotaService::new(store.clone(), ceiling, window),
            store,
        )
    }

    #[tokio::test]
    async fn test_first_request_seeds_counter() {
        let (quota, store) = service(10, Duration::from_secs(1800));

        let decision = quota.check_and_reserve("1.2.3.4").await;
        assert_eq!(decision, QuotaDecision::Allowed);

        assert_eq!(store.get("1.2.3.4").await.unwrap().as_deref(), Some("10"));
        let ttl = store.ttl("1.2.3.4").await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(1800));
    }

    #[tokio::test]
    async fn test_ceiling_enforced() {
        let (quota, _store) = service(2, Duration::from_secs(1800));
        let client = "1.2.3.4";

        // First N requests pass, each consuming one unit on success.
        for _ in 0..2 {
            assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);
            quota.consume(client).await;
        }

        match quota.check_and_reserve(client).await {
            QuotaDecision::Denied { reset_minutes } => {
                assert!(reset_minutes <= 30);
            }
            QuotaDecision::Allowed => panic!("expected denial after ceiling"),
        }
    }

    #[tokio::test]
    async fn test_consume_reports_remaining() {
        let (quota, _store) = service(10, Duration::from_secs(1800));
        let client = "1.2.3.4";

        assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);

        let state = quota.consume(client).await;
        assert_eq!(state.remaining, 9);
        assert!(state.reset_minutes <= 30);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_quota() {
        let (quota, _store) = service(1, Duration::from_millis(100));
        let client = "1.2.3.4";

        assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);
        quota.consume(client).await;
        assert!(matches!(
            quota.check_and_reserve(client).await,
            QuotaDecision::Denied { .. }
        ));

        // After the window TTL elapses the record is gone and the client
        // starts over with a fresh ceiling.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);
    }

    #[tokio::test]
    async fn test_consume_after_record_expiry_rearms_window() {
        let (quota, store) = service(1, Duration::from_millis(100));
        let client = "1.2.3.4";

        assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);

        // Record expires between the check and the consume. The decrement
        // re-creates the counter without a TTL; consume must re-apply the
        // window so the client is not locked out for good.
        tokio::time::sleep(Duration::from_millis(150)).await;

        let state = quota.consume(client).await;
        assert_eq!(state.remaining, -1);
        assert!(store.ttl(client).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(quota.check_and_reserve(client).await, QuotaDecision::Allowed);
    }

    #[tokio::test]
    async fn test_clients_tracked_independently() {
        let (quota, _store) = service(1, Duration::from_secs(1800));

        assert_eq!(quota.check_and_reserve("a").await, QuotaDecision::Allowed);
        quota.consume("a").await;
        assert!(matches!(
            quota.check_and_reserve("a").await,
            QuotaDecision::Denied { .. }
        ));

        assert_eq!(quota.check_and_reserve("b").await, QuotaDecision::Allowed);
    }
}
