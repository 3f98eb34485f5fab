//! Route definitions for the system page, search and suggestions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{search, suggest, system};
use crate::state::AppState;

/// Routes mounted at `/system`.
///
/// ```text
/// GET  /uptime              -> uptime
/// GET  /info                -> info
/// GET  /update              -> update
/// GET  /logs/{file}         -> read_log
/// POST /reset               -> reset
/// POST /database/download   -> download_database
/// POST /export              -> export_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/uptime", get(system::uptime))
        .route("/info", get(system::info))
        .route("/update", get(system::update))
        .route("/logs/{file}", get(system::read_log))
        .route("/reset", post(system::reset))
        .route("/database/download", post(system::download_database))
        .route("/export", post(system::export_all))
}

/// Routes mounted at `/suggest`.
pub fn suggest_router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(suggest::suggest_tags))
        .route("/series", get(suggest::suggest_series))
        .route("/actors", get(suggest::suggest_actors))
}

/// Top-level search and database health routes.
pub fn misc_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/db/health", get(system::db_health))
}
