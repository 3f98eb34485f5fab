//! Handlers for the `/series` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::error::CoreError;
use myficdb_db::models::series::{Series, SeriesDetail};
use myficdb_db::repositories::{SeriesRepo, StoryRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_series(state: &AppState, slug: &str) -> AppResult<Series> {
    SeriesRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Series",
                slug: slug.to_string(),
            })
        })
}

/// GET /api/v1/series
pub async fn list_series(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let series = SeriesRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /api/v1/series/{slug}
pub async fn get_series(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let series = load_series(&state, &slug).await?;
    let stories = StoryRepo::cards_for_series(&state.pool, series.id).await?;
    Ok(Json(DataResponse {
        data: SeriesDetail { series, stories },
    }))
}

/// DELETE /api/v1/series/{slug}
pub async fn delete_series(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let series = load_series(&state, &slug).await?;

    let linked = SeriesRepo::story_count(&state.pool, series.id).await?;
    if linked > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Series '{}' is still used by {linked} stories",
            series.name
        ))));
    }

    SeriesRepo::delete(&state.pool, series.id).await?;
    tracing::info!(series_id = series.id, slug = %series.slug, user_id = auth.user_id, "Series deleted");

    Ok(StatusCode::NO_CONTENT)
}
