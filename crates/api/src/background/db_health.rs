//! Periodic database health check.
//!
//! Runs once at startup and then on a fixed interval, publishing each
//! result to a single-slot [`HealthStore`] read by `GET /db/health`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use myficdb_core::text::format_file_size;
use myficdb_core::types::Timestamp;
use myficdb_db::repositories::SystemRepo;
use myficdb_db::DbPool;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Result of one health check.
#[derive(Debug, Clone, Serialize)]
pub struct DbHealthSnapshot {
    pub can_connect: bool,
    /// `PRAGMA integrity_check` output, `ok` when healthy.
    pub integrity: String,
    pub size_formatted: String,
    /// Last time the database connected and passed the integrity check.
    pub last_ok_utc: Option<Timestamp>,
    pub checked_at_utc: Timestamp,
    pub error: Option<String>,
}

/// Latest snapshot; each write replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct HealthStore {
    slot: Arc<RwLock<Option<DbHealthSnapshot>>>,
}

impl HealthStore {
    pub async fn current(&self) -> Option<DbHealthSnapshot> {
        self.slot.read().await.clone()
    }

    pub async fn set(&self, snapshot: DbHealthSnapshot) {
        *self.slot.write().await = Some(snapshot);
    }
}

/// Run the health check loop until `cancel` fires.
pub async fn run(pool: DbPool, store: HealthStore, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Database health job started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Database health job stopping");
                break;
            }
            _ = ticker.tick() => {
                check_once(&pool, &store).await;
            }
        }
    }
}

/// Run a single check and publish its snapshot.
pub async fn check_once(pool: &DbPool, store: &HealthStore) -> DbHealthSnapshot {
    let previous_ok = store.current().await.and_then(|s| s.last_ok_utc);

    let snapshot = match probe(pool, previous_ok).await {
        Ok(snapshot) => {
            tracing::debug!(integrity = %snapshot.integrity, "Database health check completed");
            snapshot
        }
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            DbHealthSnapshot {
                can_connect: false,
                integrity: "FAIL".to_string(),
                size_formatted: "0B".to_string(),
                last_ok_utc: previous_ok,
                checked_at_utc: Utc::now(),
                error: Some(e.to_string()),
            }
        }
    };

    store.set(snapshot.clone()).await;
    snapshot
}

async fn probe(
    pool: &DbPool,
    previous_ok: Option<Timestamp>,
) -> Result<DbHealthSnapshot, sqlx::Error> {
    myficdb_db::health_check(pool).await?;
    let integrity = SystemRepo::integrity_check(pool).await?.trim().to_string();
    let size = SystemRepo::database_size(pool).await?;

    let now = Utc::now();
    let last_ok_utc = if integrity.eq_ignore_ascii_case("ok") {
        Some(now)
    } else {
        previous_ok
    };

    Ok(DbHealthSnapshot {
        can_connect: true,
        integrity,
        size_formatted: format_file_size(u64::try_from(size).unwrap_or(0)),
        last_ok_utc,
        checked_at_utc: now,
        error: None,
    })
}
