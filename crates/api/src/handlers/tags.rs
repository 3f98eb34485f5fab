//! Handlers for the `/tags` resource.
//!
//! Tags are created implicitly when stories are saved, so the API only
//! lists, shows and deletes them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::error::CoreError;
use myficdb_db::models::tag::{Tag, TagDetail};
use myficdb_db::repositories::{StoryRepo, TagRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_tag(state: &AppState, slug: &str) -> AppResult<Tag> {
    TagRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Tag",
                slug: slug.to_string(),
            })
        })
}

/// GET /api/v1/tags
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/{slug}
pub async fn get_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = load_tag(&state, &slug).await?;
    let stories = StoryRepo::cards_for_tag(&state.pool, tag.id).await?;
    Ok(Json(DataResponse {
        data: TagDetail { tag, stories },
    }))
}

/// DELETE /api/v1/tags/{slug}
///
/// Refused with 409 while any story still carries the tag.
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let tag = load_tag(&state, &slug).await?;

    let linked = TagRepo::story_count(&state.pool, tag.id).await?;
    if linked > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Tag '{}' is still used by {linked} stories",
            tag.name
        ))));
    }

    TagRepo::delete(&state.pool, tag.id).await?;
    tracing::info!(tag_id = tag.id, slug = %tag.slug, user_id = auth.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
