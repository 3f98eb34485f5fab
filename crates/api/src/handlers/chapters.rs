//! Handlers for chapters and their inline notes, nested under
//! `/stories/{story_id}/chapters`.
//!
//! Chapters are addressed by their number within the story, except for
//! deletion which takes the chapter id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use myficdb_core::error::CoreError;
use myficdb_core::sanitize::sanitize_html;
use myficdb_core::story::{
    clean_chapter_title, prepare_note_details, require_chapter_body, validate_chapter_number,
};
use myficdb_core::text::{count_words, time_to_read_minutes};
use myficdb_core::types::DbId;
use myficdb_db::models::chapter::{
    Chapter, ChapterFields, ChapterInput, ChapterView, CreateInlineNote, InlineNote,
};
use myficdb_db::models::story::Story;
use myficdb_db::repositories::{ChapterRepo, StoryRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_story(state: &AppState, story_id: DbId) -> AppResult<Story> {
    StoryRepo::find_by_id(&state.pool, story_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id: story_id,
        }))
}

async fn load_chapter(state: &AppState, story_id: DbId, number: i64) -> AppResult<Chapter> {
    ChapterRepo::find_by_number(&state.pool, story_id, number)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chapter",
            id: number,
        }))
}

/// Validate the body of a create / edit request: number range, title
/// length, non-empty body. The body is sanitized and its words counted.
fn validate_chapter_input(input: &ChapterInput) -> Result<ChapterFields, CoreError> {
    validate_chapter_number(input.number)?;
    let title = clean_chapter_title(input.title.as_deref())?;
    let body = sanitize_html(require_chapter_body(&input.body)?);
    let word_count = count_words(&body);

    Ok(ChapterFields {
        number: input.number,
        title,
        body,
        word_count,
    })
}

async fn ensure_number_free(
    state: &AppState,
    story_id: DbId,
    number: i64,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    if ChapterRepo::number_taken(&state.pool, story_id, number, exclude_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Chapter {number} already exists for this story"
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Chapters
// ---------------------------------------------------------------------------

/// GET /api/v1/stories/{story_id}/chapters/next-number
pub async fn next_number(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_story(&state, story_id).await?;
    let next = ChapterRepo::next_number(&state.pool, story_id).await?;
    Ok(Json(DataResponse {
        data: json!({ "next_number": next }),
    }))
}

/// POST /api/v1/stories/{story_id}/chapters
pub async fn create_chapter(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
    Json(input): Json<ChapterInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Chapter>>)> {
    load_story(&state, story_id).await?;
    let fields = validate_chapter_input(&input)?;
    ensure_number_free(&state, story_id, fields.number, None).await?;

    let chapter = ChapterRepo::create(&state.pool, story_id, &fields).await?;

    tracing::info!(
        story_id,
        chapter_id = chapter.id,
        number = chapter.number,
        word_count = fields.word_count,
        user_id = auth.user_id,
        "Chapter created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: chapter })))
}

/// GET /api/v1/stories/{story_id}/chapters/{number}
///
/// Chapter body with reading time and the neighbouring chapter numbers.
pub async fn get_chapter(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, number)): Path<(DbId, i64)>,
) -> AppResult<impl IntoResponse> {
    let story = load_story(&state, story_id).await?;
    let chapter = ChapterRepo::find_with_content(&state.pool, story_id, number)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chapter",
            id: number,
        }))?;
    let (previous_number, next_number) =
        ChapterRepo::neighbours(&state.pool, story_id, number).await?;

    Ok(Json(DataResponse {
        data: ChapterView {
            story_title: story.title,
            time_to_read_minutes: time_to_read_minutes(chapter.word_count),
            chapter,
            previous_number,
            next_number,
        },
    }))
}

/// PUT /api/v1/stories/{story_id}/chapters/{number}
///
/// Rewrites title, number and body. Inline notes of the chapter are cleared
/// because their anchors no longer match the new text.
pub async fn update_chapter(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, number)): Path<(DbId, i64)>,
    Json(input): Json<ChapterInput>,
) -> AppResult<impl IntoResponse> {
    let existing = load_chapter(&state, story_id, number).await?;
    let fields = validate_chapter_input(&input)?;
    ensure_number_free(&state, story_id, fields.number, Some(existing.id)).await?;

    let chapter = ChapterRepo::update(&state.pool, existing.id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chapter",
            id: existing.id,
        }))?;

    tracing::info!(
        story_id,
        chapter_id = chapter.id,
        number = chapter.number,
        user_id = auth.user_id,
        "Chapter updated"
    );

    Ok(Json(DataResponse { data: chapter }))
}

/// DELETE /api/v1/stories/{story_id}/chapters/by-id/{chapter_id}
pub async fn delete_chapter(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, chapter_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !ChapterRepo::delete(&state.pool, story_id, chapter_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Chapter",
            id: chapter_id,
        }));
    }

    tracing::info!(story_id, chapter_id, user_id = auth.user_id, "Chapter deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Inline notes
// ---------------------------------------------------------------------------

/// GET /api/v1/stories/{story_id}/chapters/{number}/notes
///
/// Newest first.
pub async fn list_notes(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, number)): Path<(DbId, i64)>,
) -> AppResult<impl IntoResponse> {
    let chapter = load_chapter(&state, story_id, number).await?;
    let notes = ChapterRepo::list_notes(&state.pool, chapter.id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/stories/{story_id}/chapters/{number}/notes
///
/// Details are trimmed and cut to 800 characters; under 2 is rejected.
pub async fn create_note(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, number)): Path<(DbId, i64)>,
    Json(input): Json<CreateInlineNote>,
) -> AppResult<(StatusCode, Json<DataResponse<InlineNote>>)> {
    let chapter = load_chapter(&state, story_id, number).await?;
    let details = prepare_note_details(&input.details)?;
    let note = ChapterRepo::create_note(&state.pool, chapter.id, &details).await?;

    tracing::debug!(chapter_id = chapter.id, note_id = note.id, "Inline note added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// DELETE /api/v1/stories/{story_id}/chapters/{number}/notes/{note_id}
pub async fn delete_note(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((story_id, number, note_id)): Path<(DbId, i64, DbId)>,
) -> AppResult<StatusCode> {
    let chapter = load_chapter(&state, story_id, number).await?;
    if !ChapterRepo::delete_note(&state.pool, chapter.id, note_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Note",
            id: note_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
