//! # linkcut
//!
//! A rate-limited URL shortening service built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Application Layer** ([`application`]) - Quota guard and shortener services
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value store backends (Redis, in-memory)
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Request flow
//!
//! An inbound shorten request passes through the quota guard first; if quota
//! remains it proceeds to the shortener (validation, collision check,
//! persistence), then the guard decrements the client's counter and the
//! updated quota state is reported in the response.
//!
//! ## Quick Start
//!
//! ```bash
//! # Set required environment variables
//! export DOMAIN="s.example.com"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory fallback
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod api;
pub mod application;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{QuotaDecision, QuotaService, ShortenService};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{KeyValueStore, MemoryStore, RedisStore};
    pub use crate::state::AppState;
}
