//! Repository for the `chapters`, `chapter_contents` and
//! `chapter_inline_notes` tables.

use myficdb_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::chapter::{
    Chapter, ChapterFields, ChapterSummary, ChapterWithContent, InlineNote,
};

/// Column list for `chapters` queries.
const COLUMNS: &str = "id, story_id, number, title, created_at, updated_at";

/// Chapter joined with its body, over `chapters c` and `chapter_contents cc`.
const WITH_CONTENT_COLUMNS: &str = "c.id, c.story_id, c.number, c.title, \
    COALESCE(cc.body, '') AS body, COALESCE(cc.word_count, 0) AS word_count, \
    c.created_at, c.updated_at";

/// Column list for `chapter_inline_notes` queries.
const NOTE_COLUMNS: &str = "id, chapter_id, details, created_at, updated_at";

/// Provides CRUD operations for chapters and their inline notes.
pub struct ChapterRepo;

impl ChapterRepo {
    // -----------------------------------------------------------------------
    // Chapters
    // -----------------------------------------------------------------------

    /// The number a new chapter would get: highest existing number plus one.
    pub async fn next_number(pool: &SqlitePool, story_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(number), 0) + 1 FROM chapters WHERE story_id = ?",
        )
        .bind(story_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a chapter with `number` exists in the story, optionally
    /// ignoring the chapter `exclude_id`.
    pub async fn number_taken(
        pool: &SqlitePool,
        story_id: DbId,
        number: i64,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM chapters \
             WHERE story_id = ?1 AND number = ?2 AND (?3 IS NULL OR id <> ?3))",
        )
        .bind(story_id)
        .bind(number)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a chapter and its body in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        story_id: DbId,
        fields: &ChapterFields,
    ) -> Result<Chapter, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO chapters (story_id, number, title) VALUES (?, ?, ?) RETURNING {COLUMNS}"
        );
        let chapter = sqlx::query_as::<_, Chapter>(&query)
            .bind(story_id)
            .bind(fields.number)
            .bind(&fields.title)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO chapter_contents (chapter_id, body, word_count) VALUES (?, ?, ?)")
            .bind(chapter.id)
            .bind(&fields.body)
            .bind(fields.word_count)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(chapter)
    }

    /// Find a chapter by its number within a story.
    pub async fn find_by_number(
        pool: &SqlitePool,
        story_id: DbId,
        number: i64,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE story_id = ? AND number = ?");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(story_id)
            .bind(number)
            .fetch_optional(pool)
            .await
    }

    /// Find a chapter with its body by number within a story.
    pub async fn find_with_content(
        pool: &SqlitePool,
        story_id: DbId,
        number: i64,
    ) -> Result<Option<ChapterWithContent>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_CONTENT_COLUMNS} FROM chapters c \
             LEFT JOIN chapter_contents cc ON cc.chapter_id = c.id \
             WHERE c.story_id = ? AND c.number = ?"
        );
        sqlx::query_as::<_, ChapterWithContent>(&query)
            .bind(story_id)
            .bind(number)
            .fetch_optional(pool)
            .await
    }

    /// Every chapter of a story with its body, ordered by number.
    pub async fn list_with_content(
        pool: &SqlitePool,
        story_id: DbId,
    ) -> Result<Vec<ChapterWithContent>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_CONTENT_COLUMNS} FROM chapters c \
             LEFT JOIN chapter_contents cc ON cc.chapter_id = c.id \
             WHERE c.story_id = ? \
             ORDER BY c.number"
        );
        sqlx::query_as::<_, ChapterWithContent>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }

    /// Chapter listing for the story view, ordered by number.
    pub async fn list_summaries(
        pool: &SqlitePool,
        story_id: DbId,
    ) -> Result<Vec<ChapterSummary>, sqlx::Error> {
        sqlx::query_as::<_, ChapterSummary>(
            "SELECT c.id, c.number, c.title, COALESCE(cc.word_count, 0) AS word_count, c.created_at \
             FROM chapters c \
             LEFT JOIN chapter_contents cc ON cc.chapter_id = c.id \
             WHERE c.story_id = ? \
             ORDER BY c.number",
        )
        .bind(story_id)
        .fetch_all(pool)
        .await
    }

    /// Numbers of the chapters immediately before and after `number`.
    pub async fn neighbours(
        pool: &SqlitePool,
        story_id: DbId,
        number: i64,
    ) -> Result<(Option<i64>, Option<i64>), sqlx::Error> {
        let previous = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(number) FROM chapters WHERE story_id = ? AND number < ?",
        )
        .bind(story_id)
        .bind(number)
        .fetch_one(pool)
        .await?;
        let next = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MIN(number) FROM chapters WHERE story_id = ? AND number > ?",
        )
        .bind(story_id)
        .bind(number)
        .fetch_one(pool)
        .await?;
        Ok((previous, next))
    }

    /// Rewrite a chapter and its body, then drop the chapter's inline notes
    /// since their anchors no longer apply. One transaction.
    ///
    /// Returns `None` if the chapter does not exist.
    pub async fn update(
        pool: &SqlitePool,
        chapter_id: DbId,
        fields: &ChapterFields,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query("UPDATE chapters SET number = ?, title = ? WHERE id = ?")
            .bind(fields.number)
            .bind(&fields.title)
            .bind(chapter_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO chapter_contents (chapter_id, body, word_count) VALUES (?, ?, ?) \
             ON CONFLICT (chapter_id) DO UPDATE SET \
                body = excluded.body, word_count = excluded.word_count",
        )
        .bind(chapter_id)
        .bind(&fields.body)
        .bind(fields.word_count)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM chapter_inline_notes WHERE chapter_id = ?")
            .bind(chapter_id)
            .execute(&mut *tx)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = ?");
        let chapter = sqlx::query_as::<_, Chapter>(&query)
            .bind(chapter_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(chapter))
    }

    /// Delete a chapter by ID within a story. Body and notes cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(
        pool: &SqlitePool,
        story_id: DbId,
        chapter_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = ? AND story_id = ?")
            .bind(chapter_id)
            .bind(story_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Inline notes
    // -----------------------------------------------------------------------

    /// Notes attached to a chapter, newest first.
    pub async fn list_notes(
        pool: &SqlitePool,
        chapter_id: DbId,
    ) -> Result<Vec<InlineNote>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM chapter_inline_notes \
             WHERE chapter_id = ? \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InlineNote>(&query)
            .bind(chapter_id)
            .fetch_all(pool)
            .await
    }

    /// Attach a note to a chapter.
    pub async fn create_note(
        pool: &SqlitePool,
        chapter_id: DbId,
        details: &str,
    ) -> Result<InlineNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapter_inline_notes (chapter_id, details) VALUES (?, ?) \
             RETURNING {NOTE_COLUMNS}"
        );
        sqlx::query_as::<_, InlineNote>(&query)
            .bind(chapter_id)
            .bind(details)
            .fetch_one(pool)
            .await
    }

    /// Delete a note belonging to the given chapter.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_note(
        pool: &SqlitePool,
        chapter_id: DbId,
        note_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapter_inline_notes WHERE id = ? AND chapter_id = ?")
            .bind(note_id)
            .bind(chapter_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
