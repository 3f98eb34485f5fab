use axum::extract::State;
use axum::{routing::get, Json, Router};
use myficdb_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Payload of the unauthenticated liveness probe.
#[derive(Serialize)]
pub struct Liveness {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub started_at_utc: Timestamp,
}

/// GET /health
async fn liveness(State(state): State<AppState>) -> Json<Liveness> {
    let db_healthy = match myficdb_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Liveness probe could not reach the database");
            false
        }
    };

    Json(Liveness {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        started_at_utc: state.started_at,
    })
}

/// Root-level routes, mounted outside `/api/v1` and without auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}
