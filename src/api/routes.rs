//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// API routes.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a shortened URL (quota-limited per client)
pub fn routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}
