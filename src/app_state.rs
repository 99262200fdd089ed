//! Shared state injected into the Axum handlers of both services.

use std::sync::Arc;

use crate::command::OperatorPanel;
use crate::config::SessionConfig;
use crate::persistence::StoreBackend;
use crate::ws::registry::SessionRegistry;

/// State of the device ingestion service.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Store every session records into.
    pub store: Arc<StoreBackend>,
    /// Operator input sampled by every session's command source.
    pub panel: Arc<OperatorPanel>,
    /// Live sessions and the shutdown signal.
    pub sessions: Arc<SessionRegistry>,
    /// Poll interval and cooldown for new sessions.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates state with an empty session registry.
    #[must_use]
    pub fn new(
        store: Arc<StoreBackend>,
        panel: Arc<OperatorPanel>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            store,
            panel,
            sessions: Arc::new(SessionRegistry::new()),
            session_config,
        }
    }
}

/// State of the read view.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Store queried for readings.
    pub store: Arc<StoreBackend>,
}

impl ViewState {
    /// Wraps the store.
    #[must_use]
    pub const fn new(store: Arc<StoreBackend>) -> Self {
        Self { store }
    }
}
