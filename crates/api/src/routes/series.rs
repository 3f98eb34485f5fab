//! Route definitions for the `/series` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::series;
use crate::state::AppState;

/// Routes mounted at `/series`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(series::list_series))
        .route(
            "/{slug}",
            get(series::get_series).delete(series::delete_series),
        )
}
