//! Repository for the `stories` table and the story card listings.

use myficdb_core::naming::NamedKind;
use myficdb_core::text::{truncate_words, SUMMARY_PREVIEW_WORDS};
use myficdb_core::types::DbId;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbError;
use crate::models::story::{Story, StoryCard, StoryFields};
use crate::repositories::story_link_repo::StoryLinkRepo;

/// Column list for `stories` queries.
const COLUMNS: &str = "id, title, summary, notes, is_own_work, is_ai_generated, is_nsfw, \
    nut_counter, read_counter, created_at, updated_at";

/// Card projection over `stories s`. Callers append joins, filters and order.
const CARD_SELECT: &str = "\
    SELECT s.id, s.title, s.summary, s.is_own_work, s.is_ai_generated, s.is_nsfw, \
           s.nut_counter, s.read_counter, s.created_at, s.updated_at, \
           (SELECT COUNT(*) FROM chapters c WHERE c.story_id = s.id) AS chapter_count, \
           (SELECT COALESCE(SUM(cc.word_count), 0) FROM chapters c \
              JOIN chapter_contents cc ON cc.chapter_id = c.id \
             WHERE c.story_id = s.id) AS total_words \
    FROM stories s";

/// Which counter column an increment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryCounter {
    Nut,
    Read,
}

impl StoryCounter {
    fn column(self) -> &'static str {
        match self {
            Self::Nut => "nut_counter",
            Self::Read => "read_counter",
        }
    }
}

/// Provides CRUD operations and listings for stories.
pub struct StoryRepo;

impl StoryRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a story and link its tags, series and actors in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        fields: &StoryFields,
        links: &StoryLinks<'_>,
    ) -> Result<Story, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stories (title, summary, notes, is_own_work, is_ai_generated, is_nsfw) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let story = sqlx::query_as::<_, Story>(&query)
            .bind(&fields.title)
            .bind(&fields.summary)
            .bind(&fields.notes)
            .bind(fields.is_own_work)
            .bind(fields.is_ai_generated)
            .bind(fields.is_nsfw)
            .fetch_one(&mut *tx)
            .await?;

        links.apply(&mut *tx, story.id).await?;

        tx.commit().await?;
        Ok(story)
    }

    /// Find a story by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = ?");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a story with the given ID exists.
    pub async fn exists(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM stories WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a story's columns and relationships in one transaction.
    ///
    /// Returns `None` if no story with the given ID exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &StoryFields,
        links: &StoryLinks<'_>,
    ) -> Result<Option<Story>, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE stories SET \
                title = ?, summary = ?, notes = ?, \
                is_own_work = ?, is_ai_generated = ?, is_nsfw = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Story>(&query)
            .bind(&fields.title)
            .bind(&fields.summary)
            .bind(&fields.notes)
            .bind(fields.is_own_work)
            .bind(fields.is_ai_generated)
            .bind(fields.is_nsfw)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(story) = updated else {
            return Ok(None);
        };

        links.apply(&mut *tx, story.id).await?;

        tx.commit().await?;

        // The trigger stamps updated_at after RETURNING was evaluated.
        Ok(Self::find_by_id(pool, id).await?.or(Some(story)))
    }

    /// Delete a story. Chapters, bodies, notes and join rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a new counter value. Does not touch `updated_at`.
    ///
    /// Returns `None` if no story with the given ID exists.
    pub async fn set_counter(
        pool: &SqlitePool,
        id: DbId,
        counter: StoryCounter,
        value: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let column = counter.column();
        let query = format!("UPDATE stories SET {column} = ? WHERE id = ? RETURNING {column}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Card listings
    // -----------------------------------------------------------------------

    /// Total number of stories.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories")
            .fetch_one(pool)
            .await
    }

    /// One page of cards, newest first.
    pub async fn list_cards(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} ORDER BY s.created_at DESC, s.title LIMIT ? OFFSET ?"
        );
        let cards = sqlx::query_as::<_, StoryCard>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Self::finish_cards(pool, cards).await
    }

    /// Cards for every story linked to the tag, newest first.
    pub async fn cards_for_tag(
        pool: &SqlitePool,
        tag_id: DbId,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} JOIN story_tags st ON st.story_id = s.id \
             WHERE st.tag_id = ? \
             ORDER BY s.created_at DESC, s.id DESC"
        );
        let cards = sqlx::query_as::<_, StoryCard>(&query)
            .bind(tag_id)
            .fetch_all(pool)
            .await?;
        Self::finish_cards(pool, cards).await
    }

    /// Cards for every story in the series, newest first then by title.
    pub async fn cards_for_series(
        pool: &SqlitePool,
        series_id: DbId,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} JOIN story_series ss ON ss.story_id = s.id \
             WHERE ss.series_id = ? \
             ORDER BY s.created_at DESC, s.title"
        );
        let cards = sqlx::query_as::<_, StoryCard>(&query)
            .bind(series_id)
            .fetch_all(pool)
            .await?;
        Self::finish_cards(pool, cards).await
    }

    /// Cards for every story featuring the actor, longest first then by title.
    pub async fn cards_for_actor(
        pool: &SqlitePool,
        actor_id: DbId,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} JOIN story_actors sa ON sa.story_id = s.id \
             WHERE sa.actor_id = ? \
             ORDER BY chapter_count DESC, s.title"
        );
        let cards = sqlx::query_as::<_, StoryCard>(&query)
            .bind(actor_id)
            .fetch_all(pool)
            .await?;
        Self::finish_cards(pool, cards).await
    }

    /// Cards matching a `LIKE` pattern against title, summary and every
    /// linked actor, tag and series name, ordered by title.
    pub async fn search_cards(
        pool: &SqlitePool,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} \
             WHERE lower(s.title) LIKE ?1 \
                OR lower(COALESCE(s.summary, '')) LIKE ?1 \
                OR EXISTS (SELECT 1 FROM story_actors sa JOIN actors a ON a.id = sa.actor_id \
                           WHERE sa.story_id = s.id AND lower(a.name) LIKE ?1) \
                OR EXISTS (SELECT 1 FROM story_tags st JOIN tags t ON t.id = st.tag_id \
                           WHERE st.story_id = s.id AND lower(t.name) LIKE ?1) \
                OR EXISTS (SELECT 1 FROM story_series ss JOIN series se ON se.id = ss.series_id \
                           WHERE ss.story_id = s.id AND lower(se.name) LIKE ?1) \
             ORDER BY s.title COLLATE NOCASE \
             LIMIT ?2"
        );
        let cards = sqlx::query_as::<_, StoryCard>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Self::finish_cards(pool, cards).await
    }

    /// Replace stored summaries with plain-text previews and attach links.
    async fn finish_cards(
        pool: &SqlitePool,
        mut cards: Vec<StoryCard>,
    ) -> Result<Vec<StoryCard>, sqlx::Error> {
        for card in &mut cards {
            card.summary = card
                .summary
                .as_deref()
                .map(|s| truncate_words(s, SUMMARY_PREVIEW_WORDS))
                .filter(|s| !s.is_empty());
        }
        StoryLinkRepo::attach_to_cards(pool, &mut cards).await?;
        Ok(cards)
    }
}

/// Desired relationship CSVs applied alongside a story write.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryLinks<'a> {
    pub tags: Option<&'a str>,
    pub series: Option<&'a str>,
    pub actors: Option<&'a str>,
}

impl StoryLinks<'_> {
    async fn apply(
        &self,
        conn: &mut SqliteConnection,
        story_id: DbId,
    ) -> Result<(), DbError> {
        StoryLinkRepo::reconcile_csv(&mut *conn, story_id, NamedKind::Tag, self.tags).await?;
        StoryLinkRepo::reconcile_csv(&mut *conn, story_id, NamedKind::Series, self.series).await?;
        StoryLinkRepo::reconcile_csv(&mut *conn, story_id, NamedKind::Actor, self.actors).await?;
        Ok(())
    }
}
