//! Handler for the link shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};
use std::net::SocketAddr;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::QuotaDecision;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Creates a shortened URL, subject to the per-client quota.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com", "short": "", "expiry": 1 }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com",
///   "short": "s.example.com/Xk93hA",
///   "expiry": 1,
///   "rate_limit": 9,
///   "rate_limit_reset": 29
/// }
/// ```
///
/// # Flow
///
/// The quota guard runs first; quota is only consumed after the shortener
/// succeeds, so rejected requests never cost the client anything. The
/// response carries the post-decrement quota state.
///
/// # Errors
///
/// - 400 for unparseable bodies, invalid URLs, or self-referencing domains
/// - 403 when the resolved code is already in use
/// - 503 when the quota is exhausted (with minutes until reset)
/// - 500 when the mapping write fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;

    let client = client_ip(&headers, peer, state.behind_proxy);

    if let QuotaDecision::Denied { reset_minutes } = state.quota.check_and_reserve(&client).await {
        tracing::debug!(%client, reset_minutes, "rate limit exceeded");
        return Err(AppError::RateLimited { reset_minutes });
    }

    let link = state
        .shortener
        .shorten(&payload.url, &payload.short, payload.expiry)
        .await?;

    let quota = state.quota.consume(&client).await;

    Ok(Json(ShortenResponse {
        url: link.long_url,
        short: link.short_url,
        expiry: link.expiry_hours,
        rate_limit: quota.remaining,
        rate_limit_reset: quota.reset_minutes,
    }))
}
