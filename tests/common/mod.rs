#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use std::net::SocketAddr;

use axum::Router;
use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::routing::{get, post};
use linkcut::api::handlers::{health_handler, shorten_handler};
use linkcut::application::services::{QuotaService, ShortenService};
use linkcut::infrastructure::store::MemoryStore;
use linkcut::state::AppState;

pub const TEST_DOMAIN: &str = "s.test.local";

/// Test fixture exposing the state plus raw store handles, so tests can
/// pre-seed mappings and inspect what was persisted.
pub struct TestContext {
    pub state: AppState,
    pub quota_store: Arc<MemoryStore>,
    pub link_store: Arc<MemoryStore>,
}

/// Builds an [`AppState`] over in-memory stores.
///
/// `behind_proxy` is enabled so tests can pick their client identity via
/// the `X-Forwarded-For` header; without it every request through the mock
/// transport would share one identity.
pub fn create_test_state(api_quota: u32, window: Duration) -> TestContext {
    let quota_store = Arc::new(MemoryStore::new());
    let link_store = Arc::new(MemoryStore::new());

    let quota = Arc::new(QuotaService::new(quota_store.clone(), api_quota, window));
    let shortener = Arc::new(ShortenService::new(link_store.clone(), TEST_DOMAIN));

    let state = AppState {
        quota,
        shortener,
        store: link_store.clone(),
        behind_proxy: true,
    };

    TestContext {
        state,
        quota_store,
        link_store,
    }
}

/// Router with the routes under test.
///
/// Wrapped with connect info so the shorten handler's peer-address
/// extractor resolves under the mock transport.
pub fn test_app(state: AppState) -> IntoMakeServiceWithConnectInfo<Router, SocketAddr> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/shorten", post(shorten_handler))
        .with_state(state)
        .into_make_service_with_connect_info::<SocketAddr>()
}
