use std::sync::Arc;

use chrono::Utc;
use myficdb_core::types::Timestamp;

use crate::background::db_health::HealthStore;
use crate::config::ServerConfig;
use crate::update::UpdateChecker;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: myficdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Latest database health snapshot.
    pub health: HealthStore,
    /// GitHub release lookup.
    pub updates: Arc<UpdateChecker>,
    /// When the process started serving.
    pub started_at: Timestamp,
}

impl AppState {
    pub fn new(pool: myficdb_db::DbPool, config: ServerConfig, updates: UpdateChecker) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            health: HealthStore::default(),
            updates: Arc::new(updates),
            started_at: Utc::now(),
        }
    }
}
