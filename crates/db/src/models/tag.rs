//! Tag models.

use myficdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::story::StoryCard;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub normalized_name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Tag listing entry with the number of linked stories.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub story_count: i64,
}

/// Tag autocomplete entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagSuggestion {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// A tag with every story that carries it.
#[derive(Debug, Clone, Serialize)]
pub struct TagDetail {
    #[serde(flatten)]
    pub tag: Tag,
    pub stories: Vec<StoryCard>,
}
