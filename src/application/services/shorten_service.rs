//! URL validation, short-code resolution, and mapping persistence.

use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::infrastructure::store::KeyValueStore;
use crate::utils::codegen::generate_code;
use crate::utils::url_norm::{enforce_https, parse_submitted};

/// Expiry applied when the request leaves it unset.
const DEFAULT_EXPIRY_HOURS: u64 = 24;

/// Upper bound on the requested expiry (one year).
///
/// `expiry` arrives as an arbitrary integer; without a bound the
/// hours-to-seconds conversion and the store's deadline arithmetic are
/// handed values they cannot represent.
const MAX_EXPIRY_HOURS: u64 = 24 * 365;

/// A persisted short link.
#[derive(Debug)]
pub struct ShortLink {
    pub code: String,
    /// The normalized (https-enforced) long URL as stored.
    pub long_url: String,
    /// Fully-qualified short link: `<domain>/<code>`.
    pub short_url: String,
    pub expiry_hours: u64,
}

/// Service for creating short links.
///
/// Every step is a hard gate applied in order; the first failure wins and
/// nothing is written before all gates pass, so no failure path needs a
/// rollback. There are no retries: a generated code that happens to
/// collide is reported exactly like a taken custom code.
pub struct ShortenService {
    store: Arc<dyn KeyValueStore>,
    /// This service's own public domain, without scheme.
    domain: String,
}

impl ShortenService {
    pub fn new(store: Arc<dyn KeyValueStore>, domain: impl Into<String>) -> Self {
        Self {
            store,
            domain: domain.into(),
        }
    }

    /// Creates a short link for a URL.
    ///
    /// # Arguments
    ///
    /// - `url` - The long URL; scheme-less input is accepted and treated as https
    /// - `custom_code` - Requested short code; empty means auto-generate
    /// - `expiry_hours` - Mapping lifetime; 0 means the 24-hour default
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL fails syntactic validation
    /// - [`AppError::InvalidDomain`] if the URL points at this service itself
    /// - [`AppError::CodeInUse`] if the resolved code is already mapped
    /// - [`AppError::BadRequest`] if the expiry exceeds the one-year bound
    /// - [`AppError::StorageUnavailable`] if the mapping write fails
    pub async fn shorten(
        &self,
        url: &str,
        custom_code: &str,
        expiry_hours: u64,
    ) -> Result<ShortLink, AppError> {
        let url = url.trim();
        let parsed = parse_submitted(url).map_err(AppError::invalid_url)?;

        // Refuse to shorten an already-shortened link; redirect cycles
        // otherwise become possible.
        if let Some(host) = parsed.host_str()
            && self.is_own_domain(host)
        {
            return Err(AppError::InvalidDomain);
        }

        let long_url = enforce_https(url);

        let code = if custom_code.is_empty() {
            generate_code()
        } else {
            custom_code.to_string()
        };

        match self.store.get(&code).await {
            Ok(Some(_)) => return Err(AppError::code_in_use(code)),
            Ok(None) => {}
            Err(e) => {
                // Read errors here are treated as "absent"; the write below
                // is the authoritative failure point.
                tracing::warn!(%code, error = %e, "collision check read failed");
            }
        }

        let expiry_hours = if expiry_hours == 0 {
            DEFAULT_EXPIRY_HOURS
        } else {
            expiry_hours
        };

        if expiry_hours > MAX_EXPIRY_HOURS {
            return Err(AppError::bad_request(format!(
                "expiry must be at most {MAX_EXPIRY_HOURS} hours"
            )));
        }

        self.store
            .set(&code, &long_url, Duration::from_secs(expiry_hours * 3600))
            .await
            .map_err(|e| AppError::storage_unavailable(e.to_string()))?;

        tracing::info!(%code, expiry_hours, "short link created");

        let short_url = format!("{}/{}", self.domain.trim_end_matches('/'), code);

        Ok(ShortLink {
            code,
            long_url,
            short_url,
            expiry_hours,
        })
    }

    /// Compares a submitted host against the configured domain, ignoring
    /// ASCII case and any port on either side.
    fn is_own_domain(&self, host: &str) -> bool {
        let own = self
            .domain
            .rsplit_once(':')
            .map_or(self.domain.as_str(), |(h, _)| h);
        host.eq_ignore_ascii_case(own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::MemoryStore;

    fn service() -> (ShortenService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            ShortenService::new(store.clone(), "s.example.com"),
            store,
        )
    }

    #[tokio::test]
    async fn test_shorten_generates_code() {
        let (shortener, store) = service();

        let link = shortener.shorten("example.com", "", 1).await.unwrap();

        assert_eq!(link.code.len(), 6);
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.short_url, format!("s.example.com/{}", link.code));
        assert_eq!(link.expiry_hours, 1);

        assert_eq!(
            store.get(&link.code).await.unwrap().as_deref(),
            Some("https://example.com")
        );
        let ttl = store.ttl(&link.code).await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(3600));
        assert!(ttl > Duration::from_secs(3590));
    }

    #[tokio::test]
    async fn test_shorten_custom_code() {
        let (shortener, _store) = service();

        let link = shortener
            .shorten("https://example.com", "mycode", 1)
            .await
            .unwrap();

        assert_eq!(link.code, "mycode");
        assert_eq!(link.short_url, "s.example.com/mycode");
    }

    #[tokio::test]
    async fn test_shorten_rewrites_http() {
        let (shortener, store) = service();

        let link = shortener.shorten("http://example.com", "", 1).await.unwrap();

        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(
            store.get(&link.code).await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let (shortener, _store) = service();

        let err = shortener.shorten("not a url", "", 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_shorten_own_domain_rejected() {
        let (shortener, _store) = service();

        let err = shortener
            .shorten("https://s.example.com/abc123", "", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDomain));

        // Case and port differences don't evade the check.
        let err = shortener
            .shorten("https://S.EXAMPLE.COM:8080/abc", "", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDomain));
    }

    #[tokio::test]
    async fn test_shorten_collision() {
        let (shortener, store) = service();

        store
            .set("abc123", "https://elsewhere.com", Duration::from_secs(60))
            .await
            .unwrap();

        let err = shortener
            .shorten("https://example.com", "abc123", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeInUse { .. }));

        // The existing mapping is untouched.
        assert_eq!(
            store.get("abc123").await.unwrap().as_deref(),
            Some("https://elsewhere.com")
        );
    }

    #[tokio::test]
    async fn test_shorten_expiry_out_of_range() {
        let (shortener, store) = service();

        let err = shortener
            .shorten("https://example.com", "big001", u64::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        // Nothing was persisted.
        assert_eq!(store.get("big001").await.unwrap(), None);

        // The bound itself is accepted.
        let link = shortener
            .shorten("https://example.com", "big001", MAX_EXPIRY_HOURS)
            .await
            .unwrap();
        assert_eq!(link.expiry_hours, MAX_EXPIRY_HOURS);
    }

    #[tokio::test]
    async fn test_shorten_default_expiry() {
        let (shortener, store) = service();

        let link = shortener.shorten("https://example.com", "", 0).await.unwrap();

        assert_eq!(link.expiry_hours, 24);
        let ttl = store.ttl(&link.code).await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(24 * 3600));
        assert!(ttl > Duration::from_secs(24 * 3600 - 10));
    }
}
