//! Handlers for the `/stories` resource: CRUD, counters and exports.
//!
//! Relationship lists (tags, series, actors) arrive as comma-separated
//! strings and are reconciled by the repository inside the same transaction
//! as the story row. All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::csv_list::{validate_csv_list, STORY_LINK_RULES};
use myficdb_core::error::CoreError;
use myficdb_core::export::{render_story, ExportFormat};
use myficdb_core::naming::NamedKind;
use myficdb_core::sanitize::sanitize_html;
use myficdb_core::story::{
    apply_counter_delta, blank_to_none, page_window, validate_story_title, STORY_PAGE_SIZE,
};
use myficdb_core::types::DbId;
use myficdb_db::models::story::{
    CounterDelta, Story, StoryDetail, StoryEditForm, StoryFields, StoryInput, StoryPage,
};
use myficdb_db::repositories::{
    ChapterRepo, ExportRepo, StoryCounter, StoryLinkRepo, StoryLinks, StoryRepo,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{Attachment, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn story_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Story",
        id,
    })
}

/// Validate a create / update body into storable columns.
fn validate_story_input(input: &StoryInput) -> Result<StoryFields, CoreError> {
    let title = validate_story_title(&input.title)?;
    validate_csv_list("Tags", input.tags.as_deref(), STORY_LINK_RULES)?;
    validate_csv_list("Series", input.series.as_deref(), STORY_LINK_RULES)?;
    validate_csv_list("Actors", input.actors.as_deref(), STORY_LINK_RULES)?;

    Ok(StoryFields {
        title,
        summary: blank_to_none(input.summary.as_deref().map(sanitize_html)),
        notes: blank_to_none(input.notes.as_deref().map(sanitize_html)),
        is_own_work: input.is_own_work,
        is_ai_generated: input.is_ai_generated,
        is_nsfw: input.is_nsfw,
    })
}

fn links_of(input: &StoryInput) -> StoryLinks<'_> {
    StoryLinks {
        tags: input.tags.as_deref(),
        series: input.series.as_deref(),
        actors: input.actors.as_deref(),
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/stories?page=
///
/// Ten cards per page, newest first. The page is clamped into range.
pub async fn list_stories(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let total = StoryRepo::count(&state.pool).await?;
    let window = page_window(params.page, total, STORY_PAGE_SIZE);
    let items = StoryRepo::list_cards(&state.pool, window.limit, window.offset).await?;

    Ok(Json(DataResponse {
        data: StoryPage {
            items,
            page: window.page,
            total_pages: window.total_pages,
            total_count: total,
        },
    }))
}

/// POST /api/v1/stories
pub async fn create_story(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StoryInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Story>>)> {
    let fields = validate_story_input(&input)?;
    let story = StoryRepo::create(&state.pool, &fields, &links_of(&input)).await?;

    tracing::info!(story_id = story.id, user_id = auth.user_id, "Story created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: story })))
}

/// GET /api/v1/stories/{id}
pub async fn get_story(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let story = StoryRepo::find_by_id(&state.pool, story_id)
        .await?
        .ok_or_else(|| story_not_found(story_id))?;

    let chapters = ChapterRepo::list_summaries(&state.pool, story_id).await?;
    let tags = StoryLinkRepo::names_for_story(&state.pool, story_id, NamedKind::Tag).await?;
    let series = StoryLinkRepo::names_for_story(&state.pool, story_id, NamedKind::Series).await?;
    let actors = StoryLinkRepo::actors_for_story(&state.pool, story_id).await?;

    Ok(Json(DataResponse {
        data: StoryDetail {
            story,
            chapters,
            tags,
            series,
            actors,
        },
    }))
}

/// GET /api/v1/stories/{id}/edit-form
///
/// Current values with relationship lists rendered as sorted CSV strings.
pub async fn get_edit_form(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let story = StoryRepo::find_by_id(&state.pool, story_id)
        .await?
        .ok_or_else(|| story_not_found(story_id))?;

    let tags = StoryLinkRepo::csv_for_story(&state.pool, story_id, NamedKind::Tag).await?;
    let series = StoryLinkRepo::csv_for_story(&state.pool, story_id, NamedKind::Series).await?;
    let actors = StoryLinkRepo::csv_for_story(&state.pool, story_id, NamedKind::Actor).await?;

    Ok(Json(DataResponse {
        data: StoryEditForm {
            id: story.id,
            title: story.title,
            summary: story.summary,
            notes: story.notes,
            is_own_work: story.is_own_work,
            is_ai_generated: story.is_ai_generated,
            is_nsfw: story.is_nsfw,
            tags,
            series,
            actors,
        },
    }))
}

/// PUT /api/v1/stories/{id}
pub async fn update_story(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<StoryInput>,
) -> AppResult<impl IntoResponse> {
    let fields = validate_story_input(&input)?;
    let story = StoryRepo::update(&state.pool, story_id, &fields, &links_of(&input))
        .await?
        .ok_or_else(|| story_not_found(story_id))?;

    tracing::info!(story_id, user_id = auth.user_id, "Story updated");

    Ok(Json(DataResponse { data: story }))
}

/// DELETE /api/v1/stories/{id}
///
/// Chapters, their bodies and notes, and every join row go with it.
pub async fn delete_story(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !StoryRepo::delete(&state.pool, story_id).await? {
        return Err(story_not_found(story_id));
    }

    tracing::info!(story_id, user_id = auth.user_id, "Story deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

async fn bump_counter(
    state: &AppState,
    story_id: DbId,
    counter: StoryCounter,
    delta: i64,
) -> AppResult<i64> {
    let story = StoryRepo::find_by_id(&state.pool, story_id)
        .await?
        .ok_or_else(|| story_not_found(story_id))?;

    let current = match counter {
        StoryCounter::Nut => story.nut_counter,
        StoryCounter::Read => story.read_counter,
    };
    let value = apply_counter_delta(current, delta)?;

    StoryRepo::set_counter(&state.pool, story_id, counter, value)
        .await?
        .ok_or_else(|| story_not_found(story_id))
}

/// POST /api/v1/stories/{id}/nut
pub async fn bump_nut(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<CounterDelta>,
) -> AppResult<impl IntoResponse> {
    let value = bump_counter(&state, story_id, StoryCounter::Nut, input.delta).await?;
    Ok(Json(DataResponse {
        data: json!({ "nut_counter": value }),
    }))
}

/// POST /api/v1/stories/{id}/read
pub async fn bump_read(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<CounterDelta>,
) -> AppResult<impl IntoResponse> {
    let value = bump_counter(&state, story_id, StoryCounter::Read, input.delta).await?;
    Ok(Json(DataResponse {
        data: json!({ "read_counter": value }),
    }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/stories/{id}/export/{type}
///
/// `type` is `html`, `markdown` or `md`.
pub async fn export_story(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, export_type)): Path<(DbId, String)>,
) -> AppResult<Attachment> {
    let format = ExportFormat::parse(&export_type).ok_or_else(|| {
        AppError::BadRequest(format!("Unsupported export type '{export_type}'"))
    })?;

    let aggregate = ExportRepo::load_story(&state.pool, story_id)
        .await?
        .ok_or_else(|| story_not_found(story_id))?;

    let payload = render_story(&aggregate, format)?;

    tracing::info!(story_id, format = format.extension(), "Story exported");

    Ok(Attachment {
        file_name: payload.file_name,
        content_type: payload.content_type,
        bytes: payload.bytes,
    })
}
