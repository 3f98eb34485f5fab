//! Repository for the `tags` table.

use myficdb_core::naming::NamedKind;
use myficdb_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::tag::{Tag, TagSuggestion, TagWithCount};
use crate::repositories::named_repo;

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, normalized_name, slug, created_at, updated_at";

/// Provides lookups, listing and deletion for tags.
///
/// Tags are created on demand when a story is saved; see
/// [`StoryLinkRepo::reconcile_csv`](crate::repositories::StoryLinkRepo::reconcile_csv).
pub struct TagRepo;

impl TagRepo {
    /// Find a tag by its slug (case-insensitive).
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE slug = lower(?)");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All tags with the number of stories carrying each, ordered by name.
    pub async fn list_with_counts(pool: &SqlitePool) -> Result<Vec<TagWithCount>, sqlx::Error> {
        sqlx::query_as::<_, TagWithCount>(
            "SELECT t.id, t.name, t.slug, \
                    (SELECT COUNT(*) FROM story_tags st WHERE st.tag_id = t.id) AS story_count \
             FROM tags t \
             ORDER BY t.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of stories linked to the tag.
    pub async fn story_count(pool: &SqlitePool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM story_tags WHERE tag_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Autocomplete: tags whose normalized name contains `needle`, prefix
    /// matches first.
    pub async fn suggest(
        pool: &SqlitePool,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<TagSuggestion>, sqlx::Error> {
        let query = named_repo::suggest_query(NamedKind::Tag, "id, name, slug");
        sqlx::query_as::<_, TagSuggestion>(&query)
            .bind(needle)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a tag. Fails with a foreign key violation while stories still
    /// reference it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
