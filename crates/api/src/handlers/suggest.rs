//! Autocomplete endpoints used by the story form's tag, series and actor
//! inputs.
//!
//! Queries shorter than two characters (after trimming) return an empty
//! list without touching the database.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::search::{clamp_limit, suggestion_needle, DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT};
use myficdb_db::models::series::NameSuggestion;
use myficdb_db::models::tag::TagSuggestion;
use myficdb_db::repositories::{ActorRepo, SeriesRepo, TagRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::SuggestParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn limit_of(params: &SuggestParams) -> i64 {
    clamp_limit(params.limit, DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT)
}

/// GET /api/v1/suggest/tags?query=&limit=
pub async fn suggest_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> AppResult<impl IntoResponse> {
    let items: Vec<TagSuggestion> = match suggestion_needle(&params.query) {
        Some(needle) => TagRepo::suggest(&state.pool, &needle, limit_of(&params)).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/suggest/series?query=&limit=
pub async fn suggest_series(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> AppResult<impl IntoResponse> {
    let items: Vec<NameSuggestion> = match suggestion_needle(&params.query) {
        Some(needle) => SeriesRepo::suggest(&state.pool, &needle, limit_of(&params)).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/suggest/actors?query=&limit=
pub async fn suggest_actors(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> AppResult<impl IntoResponse> {
    let items: Vec<NameSuggestion> = match suggestion_needle(&params.query) {
        Some(needle) => ActorRepo::suggest(&state.pool, &needle, limit_of(&params)).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: items }))
}
