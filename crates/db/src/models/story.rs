//! Story models, listing cards and request DTOs.

use myficdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::actor::LinkedActor;
use crate::models::chapter::ChapterSummary;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub is_own_work: bool,
    pub is_ai_generated: bool,
    pub is_nsfw: bool,
    pub nut_counter: i64,
    pub read_counter: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A tag or series reference attached to a story.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LinkedName {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Story card used by every listing (index, tag, series, actor, search).
///
/// `summary` holds a plain-text preview, not the stored HTML.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoryCard {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub is_own_work: bool,
    pub is_ai_generated: bool,
    pub is_nsfw: bool,
    pub nut_counter: i64,
    pub read_counter: i64,
    pub chapter_count: i64,
    pub total_words: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub tags: Vec<LinkedName>,
    #[sqlx(skip)]
    pub series: Vec<LinkedName>,
}

/// One page of story cards.
#[derive(Debug, Clone, Serialize)]
pub struct StoryPage {
    pub items: Vec<StoryCard>,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

/// Full story view: the row plus chapters and every linked entity.
#[derive(Debug, Clone, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: Story,
    pub chapters: Vec<ChapterSummary>,
    pub tags: Vec<LinkedName>,
    pub series: Vec<LinkedName>,
    pub actors: Vec<LinkedActor>,
}

/// Current values for the edit form, with relationship lists as CSV.
#[derive(Debug, Clone, Serialize)]
pub struct StoryEditForm {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub is_own_work: bool,
    pub is_ai_generated: bool,
    pub is_nsfw: bool,
    pub tags: String,
    pub series: String,
    pub actors: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Request body for creating or updating a story.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryInput {
    pub title: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_own_work: bool,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default)]
    pub is_nsfw: bool,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    /// Comma-separated series names.
    pub series: Option<String>,
    /// Comma-separated actor names.
    pub actors: Option<String>,
}

/// Validated story columns written by create and update.
#[derive(Debug, Clone)]
pub struct StoryFields {
    pub title: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub is_own_work: bool,
    pub is_ai_generated: bool,
    pub is_nsfw: bool,
}

/// Request body for the nut / read counter endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterDelta {
    pub delta: i64,
}

/// Aggregate totals shown on the system page.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct LibraryTotals {
    pub stories: i64,
    pub tags: i64,
    pub series: i64,
    pub actors: i64,
    pub nut_total: i64,
    pub read_total: i64,
    pub nsfw_stories: i64,
}
