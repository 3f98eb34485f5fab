//! Route definitions for the `/actors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::actors;
use crate::state::AppState;

/// Routes mounted at `/actors`.
///
/// ```text
/// GET    /               -> list_actors
/// POST   /               -> create_actor (multipart)
/// GET    /{slug}         -> get_actor
/// PUT    /{slug}         -> update_actor (multipart)
/// DELETE /{slug}         -> delete_actor
/// GET    /{slug}/image   -> get_actor_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actors::list_actors).post(actors::create_actor))
        .route(
            "/{slug}",
            get(actors::get_actor)
                .put(actors::update_actor)
                .delete(actors::delete_actor),
        )
        .route("/{slug}/image", get(actors::get_actor_image))
}
