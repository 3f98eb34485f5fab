//! Repository for the `series` table.

use myficdb_core::naming::NamedKind;
use myficdb_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::series::{NameSuggestion, Series, SeriesWithCount};
use crate::repositories::named_repo;

const COLUMNS: &str = "id, name, normalized_name, slug, created_at, updated_at";

/// Provides lookups, listing and deletion for series.
pub struct SeriesRepo;

impl SeriesRepo {
    /// Find a series by its slug (case-insensitive).
    pub async fn find_by_slug(
        pool: &SqlitePool,
        slug: &str,
    ) -> Result<Option<Series>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM series WHERE slug = lower(?)");
        sqlx::query_as::<_, Series>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All series with their story counts, ordered by name.
    pub async fn list_with_counts(
        pool: &SqlitePool,
    ) -> Result<Vec<SeriesWithCount>, sqlx::Error> {
        sqlx::query_as::<_, SeriesWithCount>(
            "SELECT se.id, se.name, se.slug, \
                    (SELECT COUNT(*) FROM story_series ss WHERE ss.series_id = se.id) AS story_count \
             FROM series se \
             ORDER BY se.name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn story_count(pool: &SqlitePool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM story_series WHERE series_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn suggest(
        pool: &SqlitePool,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<NameSuggestion>, sqlx::Error> {
        let query = named_repo::suggest_query(NamedKind::Series, "id, name");
        sqlx::query_as::<_, NameSuggestion>(&query)
            .bind(needle)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a series. Restricted while stories still reference it.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM series WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
