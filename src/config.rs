//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts; request handlers receive it through [`crate::state::AppState`]
//! and never read the environment themselves.
//!
//! ## Required Variables
//!
//! - `DOMAIN` - Public domain of this service (e.g. `s.example.com`).
//!   Used to build short links and to reject attempts to shorten an
//!   already-shortened link.
//!
//! ## Optional Variables
//!
//! - `REDIS_URL` / `REDIS_HOST` - Redis connection. When neither is set the
//!   service falls back to an in-memory store (single-instance only).
//! - `API_QUOTA` - Shorten requests allowed per quota window (default: 10)
//! - `QUOTA_WINDOW_MINUTES` - Quota window length (default: 30)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Read client IP from `X-Forwarded-For` / `X-Real-IP`
//!
//! If `REDIS_URL` is not set, it will be automatically constructed from
//! `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, and `REDIS_DB`.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public domain of this service, without scheme.
    pub domain: String,
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Shorten requests allowed per client per quota window.
    pub api_quota: u32,
    /// Quota window length in minutes.
    pub quota_window_minutes: u64,
    /// When true, the client identity is read from X-Forwarded-For / X-Real-IP
    /// headers. Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DOMAIN` is missing.
    pub fn from_env() -> Result<Self> {
        let domain = env::var("DOMAIN").context("DOMAIN must be set")?;

        // Load Redis URL (optional)
        let redis_url = Self::load_redis_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let api_quota = env::var("API_QUOTA")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let quota_window_minutes = env::var("QUOTA_WINDOW_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            domain,
            redis_url,
            listen_addr,
            log_level,
            log_format,
            api_quota,
            quota_window_minutes,
            behind_proxy,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        // Priority 1: Use REDIS_URL if provided
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        // Priority 2: Build from components (if REDIS_HOST is set)
        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = if let Some(pwd) = password {
            // Empty password means no authentication
            if pwd.is_empty() {
                format!("redis://{}:{}/{}", host, port, db)
            } else {
                format!("redis://:{}@{}:{}/{}", pwd, host, port, db)
            }
        } else {
            format!("redis://{}:{}/{}", host, port, db)
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `domain` is empty or carries a scheme
    /// - `api_quota` or `quota_window_minutes` is zero
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            anyhow::bail!("DOMAIN must not be empty");
        }

        if self.domain.contains("://") {
            anyhow::bail!(
                "DOMAIN must be a bare host, without scheme, got '{}'",
                self.domain
            );
        }

        if self.api_quota == 0 {
            anyhow::bail!("API_QUOTA must be at least 1");
        }

        if self.quota_window_minutes == 0 {
            anyhow::bail!("QUOTA_WINDOW_MINUTES must be greater than 0");
        }

        // Validate log format
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        // Validate listen address format
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        // Validate Redis URL format (if present)
        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                redis_url
            );
        }

        Ok(())
    }

    /// Quota window length as a [`Duration`].
    pub fn quota_window(&self) -> Duration {
        Duration::from_secs(self.quota_window_minutes * 60)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Domain: {}", self.domain);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {}", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: not configured (in-memory store)");
        }

        tracing::info!(
            "  Quota: {} requests / {} minutes",
            self.api_quota,
            self.quota_window_minutes
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            // Check if there's a password (contains ':')
            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
