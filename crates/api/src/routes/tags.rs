//! Route definitions for the `/tags` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET    /        -> list_tags
/// GET    /{slug}  -> get_tag
/// DELETE /{slug}  -> delete_tag (409 while linked)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags))
        .route("/{slug}", get(tags::get_tag).delete(tags::delete_tag))
}
