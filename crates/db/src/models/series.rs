//! Series models.

use myficdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::story::StoryCard;

/// A row from the `series` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Series {
    pub id: DbId,
    pub name: String,
    pub normalized_name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Series listing entry with the number of linked stories.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeriesWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub story_count: i64,
}

/// Autocomplete entry for series and actors.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NameSuggestion {
    pub id: DbId,
    pub name: String,
}

/// A series with its stories.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub series: Series,
    pub stories: Vec<StoryCard>,
}
