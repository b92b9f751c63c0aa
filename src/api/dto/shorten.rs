//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    pub url: String,

    /// Requested custom short code; empty means auto-generate.
    #[serde(default)]
    pub short: String,

    /// Mapping lifetime in hours; 0 means the 24-hour default.
    #[serde(default)]
    pub expiry: u64,
}

/// Response for a successfully created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// The normalized long URL as stored.
    pub url: String,

    /// Fully-qualified short link (`<domain>/<code>`).
    pub short: String,

    /// Mapping lifetime in hours, after defaulting.
    pub expiry: u64,

    /// Remaining quota in the current window.
    pub rate_limit: i64,

    /// Whole minutes until the quota window resets.
    pub rate_limit_reset: u64,
}
