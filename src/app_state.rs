// app_state.rs

use deadpool_postgres::Pool;
use std::sync::Arc;

use crate::websocket::connection_manager::ConnectionManager;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Realtime fan-out hub for message events
    pub connections: ConnectionManager,
    /// Database connection pool wrapped in Arc for thread-safe sharing
    pub db: Arc<Pool>,
}

impl AppState {
    pub fn new(db: Arc<Pool>, connections: ConnectionManager) -> Self {
        Self { connections, db }
    }
}
