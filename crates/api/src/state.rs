use std::sync::Arc;

use clubdesk_db::PgLifecycleStore;
use clubdesk_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clubdesk_db::DbPool,
    /// Server configuration (read by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Event bus for publishing domain events after committed transitions.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// The Postgres lifecycle store over this state's pool.
    pub fn store(&self) -> PgLifecycleStore {
        PgLifecycleStore::new(self.pool.clone())
    }
}
