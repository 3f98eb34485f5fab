//! Chapter, chapter body and inline note models.

use myficdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `chapters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub story_id: DbId,
    pub number: i64,
    pub title: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Chapter listing entry on the story view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChapterSummary {
    pub id: DbId,
    pub number: i64,
    pub title: Option<String>,
    pub word_count: i64,
    pub created_at: Timestamp,
}

/// A chapter joined with its body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChapterWithContent {
    pub id: DbId,
    pub story_id: DbId,
    pub number: i64,
    pub title: Option<String>,
    pub body: String,
    pub word_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Reading view of a chapter with navigation to its neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub story_title: String,
    #[serde(flatten)]
    pub chapter: ChapterWithContent,
    pub time_to_read_minutes: f64,
    pub previous_number: Option<i64>,
    pub next_number: Option<i64>,
}

/// A row from the `chapter_inline_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InlineNote {
    pub id: DbId,
    pub chapter_id: DbId,
    pub details: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating or editing a chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterInput {
    pub number: i64,
    pub title: Option<String>,
    pub body: String,
}

/// Sanitized chapter columns written by create and edit.
#[derive(Debug, Clone)]
pub struct ChapterFields {
    pub number: i64,
    pub title: Option<String>,
    pub body: String,
    pub word_count: i64,
}

/// Request body for adding an inline note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInlineNote {
    pub details: String,
}
