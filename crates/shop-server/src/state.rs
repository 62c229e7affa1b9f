//! Application State

use std::sync::Arc;

use shop_catalog::CatalogStore;
use shop_core::{ChatTransport, SessionStore};

/// Shared state for the HTTP status endpoints
#[derive(Clone)]
pub struct AppState {
    /// Catalog store (read-only from HTTP)
    pub catalog: Arc<dyn CatalogStore>,

    /// Per-chat sessions, for counts only
    pub sessions: Arc<dyn SessionStore>,

    /// Active chat transport
    pub transport: Arc<dyn ChatTransport>,
}
