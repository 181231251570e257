use std::sync::Arc;

use caretrack_core::request::RequestIdGenerator;
use caretrack_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: caretrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Carries freshly committed notifications to live subscribers.
    pub event_bus: Arc<EventBus>,
    /// Issues `REQ-` ticket ids.
    pub request_ids: Arc<RequestIdGenerator>,
}

impl AppState {
    pub fn new(pool: caretrack_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            event_bus: Arc::new(EventBus::default()),
            request_ids: Arc::new(RequestIdGenerator::new()),
        }
    }
}
