//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, service wiring, and Axum server lifecycle.

use crate::application::services::{QuotaService, ShortenService};
use crate::config::Config;
use crate::infrastructure::store::{KeyValueStore, MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis connection manager (or in-memory store fallback)
/// - Quota guard and shortener services over two keyspaces
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the server bind fails or a runtime error occurs.
pub async fn run(config: Config) -> Result<()> {
    // Quota counters and link mappings live in separate keyspaces over one
    // shared connection manager.
    let (quota_store, link_store): (Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>) =
        if let Some(redis_url) = &config.redis_url {
            match RedisStore::connect(redis_url).await {
                Ok(manager) => (
                    Arc::new(RedisStore::new(manager.clone(), "quota:")),
                    Arc::new(RedisStore::new(manager, "link:")),
                ),
                Err(e) => {
                    tracing::warn!(
                        "Failed to connect to Redis: {}. Using in-memory store.",
                        e
                    );
                    memory_stores()
                }
            }
        } else {
            tracing::info!("Redis not configured, using in-memory store");
            memory_stores()
        };

    let quota = Arc::new(QuotaService::new(
        quota_store,
        config.api_quota,
        config.quota_window(),
    ));
    let shortener = Arc::new(ShortenService::new(link_store.clone(), &config.domain));

    let state = AppState {
        quota,
        shortener,
        store: link_store,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}

fn memory_stores() -> (Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>) {
    // A single process-local map serves both keyspaces; quota keys are
    // client IPs and link keys are short codes, which cannot collide in
    // practice, but separate instances keep the keyspaces honest.
    (
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
}
