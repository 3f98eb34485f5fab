//! Whole-database queries: totals, integrity checks, snapshots and reset.

use std::path::Path;

use sqlx::SqlitePool;

use crate::models::story::LibraryTotals;

/// Tables wiped by [`SystemRepo::reset_all`], children before parents.
const RESET_ORDER: &[&str] = &[
    "story_tags",
    "story_series",
    "story_actors",
    "chapter_inline_notes",
    "chapter_contents",
    "chapters",
    "stories",
    "actor_images",
    "actors",
    "series",
    "tags",
    "user_sessions",
    "users",
];

/// Provides database-wide maintenance queries.
pub struct SystemRepo;

impl SystemRepo {
    /// Row totals and counter sums for the system page.
    pub async fn totals(pool: &SqlitePool) -> Result<LibraryTotals, sqlx::Error> {
        sqlx::query_as::<_, LibraryTotals>(
            "SELECT \
                (SELECT COUNT(*) FROM stories) AS stories, \
                (SELECT COUNT(*) FROM tags) AS tags, \
                (SELECT COUNT(*) FROM series) AS series, \
                (SELECT COUNT(*) FROM actors) AS actors, \
                (SELECT COALESCE(SUM(nut_counter), 0) FROM stories) AS nut_total, \
                (SELECT COALESCE(SUM(read_counter), 0) FROM stories) AS read_total, \
                (SELECT COUNT(*) FROM stories WHERE is_nsfw = 1) AS nsfw_stories",
        )
        .fetch_one(pool)
        .await
    }

    /// Result of `PRAGMA integrity_check`: `"ok"` when healthy, otherwise
    /// every reported problem joined with `"; "`.
    pub async fn integrity_check(pool: &SqlitePool) -> Result<String, sqlx::Error> {
        let rows = sqlx::query_scalar::<_, String>("PRAGMA integrity_check")
            .fetch_all(pool)
            .await?;
        Ok(rows.join("; "))
    }

    /// Size of the main database in bytes (`page_count * page_size`).
    pub async fn database_size(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
        )
        .fetch_one(pool)
        .await
    }

    /// Write a consistent copy of the live database to `target`.
    ///
    /// `target` must not exist yet.
    pub async fn vacuum_into(pool: &SqlitePool, target: &Path) -> Result<(), sqlx::Error> {
        sqlx::query("VACUUM INTO ?")
            .bind(target.to_string_lossy().into_owned())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete every row from every table, including the account, in one
    /// transaction.
    pub async fn reset_all(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in RESET_ORDER {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        tracing::warn!("All library data and the account were deleted");
        Ok(())
    }
}
