use std::sync::Arc;

use crate::application::services::{QuotaService, ShortenService};
use crate::infrastructure::store::KeyValueStore;

/// Shared application state injected into all handlers.
///
/// Holds only long-lived service handles; per-request state lives entirely
/// in the external store, so the handler stays stateless across requests.
#[derive(Clone)]
pub struct AppState {
    pub quota: Arc<QuotaService>,
    pub shortener: Arc<ShortenService>,
    /// Store handle used by the health check.
    pub store: Arc<dyn KeyValueStore>,
    /// When true, the client identity is read from proxy headers.
    pub behind_proxy: bool,
}
