use std::sync::Arc;
use std::time::Duration;

use crate::templates::registry::TemplateRegistry;
use crate::templates::selection::{
    InMemorySelectionStore, SelectionStore, DEFAULT_SESSION_TTL_SECS,
};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; handlers share it without locking.
    pub registry: Arc<TemplateRegistry>,
    /// Per-session template selection. In-memory or Redis, chosen by `REDIS_URL`.
    pub selections: Arc<dyn SelectionStore>,
}

impl AppState {
    pub fn new(registry: TemplateRegistry, selections: Arc<dyn SelectionStore>) -> Self {
        AppState {
            registry: Arc::new(registry),
            selections,
        }
    }

    /// State backed by an in-process selection store with the default TTL.
    pub fn in_memory(registry: TemplateRegistry) -> Self {
        let ttl = Duration::from_secs(DEFAULT_SESSION_TTL_SECS);
        Self::new(registry, Arc::new(InMemorySelectionStore::new(ttl)))
    }
}
