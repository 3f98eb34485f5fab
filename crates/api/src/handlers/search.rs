//! Global search across titles, summaries and linked names.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::search::{fuzzy_like_pattern, GLOBAL_SEARCH_LIMIT};
use myficdb_db::repositories::StoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search?query=
///
/// Up to ten story cards ordered by title. A blank query yields `[]`.
pub async fn search(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let cards = match fuzzy_like_pattern(&params.query) {
        Some(pattern) => StoryRepo::search_cards(&state.pool, &pattern, GLOBAL_SEARCH_LIMIT).await?,
        None => Vec::new(),
    };
    tracing::debug!(query = %params.query, results = cards.len(), "Search");
    Ok(Json(DataResponse { data: cards }))
}
