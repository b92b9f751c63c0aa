//! Client identity extraction for quota accounting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Derives the quota key for a request.
///
/// Uses the peer socket IP by default. When `behind_proxy` is set, the
/// `X-Forwarded-For` (first hop) and `X-Real-IP` headers take precedence;
/// enable that only when the service runs behind a trusted reverse proxy,
/// since the headers are client-controlled otherwise.
///
/// The identity only needs to be stable and unique-enough per quota
/// window; it is never parsed back into an address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        if let Some(real_ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "203.0.113.7:54321".parse().unwrap()
    }

    #[test]
    fn test_peer_ip_by_default() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), false), "203.0.113.7");
    }

    #[test]
    fn test_headers_ignored_without_proxy_flag() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));

        assert_eq!(client_ip(&headers, peer(), false), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.0.0.1, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers, peer(), true), "10.0.0.1");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));

        assert_eq!(client_ip(&headers, peer(), true), "10.0.0.9");
    }

    #[test]
    fn test_proxy_fallback_to_peer() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_empty_forwarded_for_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));

        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.7");
    }
}
