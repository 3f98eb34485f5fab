//! Repository for the story join tables (`story_tags`, `story_series`,
//! `story_actors`).

use std::collections::{HashMap, HashSet};

use myficdb_core::naming::{parse_csv_and_clean, NamedKind, MAX_NAMES_PER_LIST};
use myficdb_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::DbError;
use crate::models::actor::LinkedActor;
use crate::models::story::{LinkedName, StoryCard};
use crate::repositories::named_repo::{self, tables};

/// A linked name plus the story it belongs to, for batch loading.
#[derive(Debug, sqlx::FromRow)]
struct StoryLinkRow {
    story_id: DbId,
    id: DbId,
    name: String,
    slug: String,
}

/// Reads and reconciles story relationships.
pub struct StoryLinkRepo;

impl StoryLinkRepo {
    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Make the story's links of `kind` match the names in `csv`.
    ///
    /// Every name is resolved to an existing row or created; join rows not
    /// in the desired set are removed and missing ones added.
    pub async fn reconcile_csv(
        conn: &mut SqliteConnection,
        story_id: DbId,
        kind: NamedKind,
        csv: Option<&str>,
    ) -> Result<(), DbError> {
        let names = parse_csv_and_clean(csv, MAX_NAMES_PER_LIST);
        let desired = named_repo::resolve_ids(&mut *conn, kind, &names).await?;
        Self::set_links(conn, story_id, kind, &desired).await?;
        Ok(())
    }

    /// Diff the current join rows against `desired` and apply the change.
    pub async fn set_links(
        conn: &mut SqliteConnection,
        story_id: DbId,
        kind: NamedKind,
        desired: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let t = tables(kind);
        let current: Vec<DbId> = sqlx::query_scalar(&format!(
            "SELECT {col} FROM {join} WHERE story_id = ?",
            col = t.join_column,
            join = t.join_table,
        ))
        .bind(story_id)
        .fetch_all(&mut *conn)
        .await?;

        let current: HashSet<DbId> = current.into_iter().collect();
        let desired: HashSet<DbId> = desired.iter().copied().collect();

        let delete = format!(
            "DELETE FROM {join} WHERE story_id = ? AND {col} = ?",
            col = t.join_column,
            join = t.join_table,
        );
        for id in current.difference(&desired) {
            sqlx::query(&delete)
                .bind(story_id)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        let insert = format!(
            "INSERT OR IGNORE INTO {join} (story_id, {col}) VALUES (?, ?)",
            col = t.join_column,
            join = t.join_table,
        );
        for id in desired.difference(&current) {
            sqlx::query(&insert)
                .bind(story_id)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Tags or series linked to a story, sorted by name.
    pub async fn names_for_story(
        pool: &SqlitePool,
        story_id: DbId,
        kind: NamedKind,
    ) -> Result<Vec<LinkedName>, sqlx::Error> {
        let t = tables(kind);
        let query = format!(
            "SELECT n.id, n.name, n.slug FROM {table} n \
             JOIN {join} j ON j.{col} = n.id \
             WHERE j.story_id = ? \
             ORDER BY n.name COLLATE NOCASE",
            table = t.table,
            join = t.join_table,
            col = t.join_column,
        );
        sqlx::query_as::<_, LinkedName>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }

    /// Actors linked to a story, sorted by name.
    pub async fn actors_for_story(
        pool: &SqlitePool,
        story_id: DbId,
    ) -> Result<Vec<LinkedActor>, sqlx::Error> {
        sqlx::query_as::<_, LinkedActor>(
            "SELECT a.id, a.name, a.slug, \
                    EXISTS (SELECT 1 FROM actor_images ai WHERE ai.actor_id = a.id) AS has_image \
             FROM actors a \
             JOIN story_actors sa ON sa.actor_id = a.id \
             WHERE sa.story_id = ? \
             ORDER BY a.name COLLATE NOCASE",
        )
        .bind(story_id)
        .fetch_all(pool)
        .await
    }

    /// Linked names of `kind` joined into a CSV string, sorted by name.
    pub async fn csv_for_story(
        pool: &SqlitePool,
        story_id: DbId,
        kind: NamedKind,
    ) -> Result<String, sqlx::Error> {
        let names = Self::names_for_story(pool, story_id, kind).await?;
        Ok(names
            .into_iter()
            .map(|n| n.name)
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// Fill `tags` and `series` on every card with two batch queries.
    pub async fn attach_to_cards(
        pool: &SqlitePool,
        cards: &mut [StoryCard],
    ) -> Result<(), sqlx::Error> {
        if cards.is_empty() {
            return Ok(());
        }
        let ids: Vec<DbId> = cards.iter().map(|c| c.id).collect();

        let mut tags = Self::load_for_stories(pool, NamedKind::Tag, &ids).await?;
        let mut series = Self::load_for_stories(pool, NamedKind::Series, &ids).await?;

        for card in cards.iter_mut() {
            card.tags = tags.remove(&card.id).unwrap_or_default();
            card.series = series.remove(&card.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn load_for_stories(
        pool: &SqlitePool,
        kind: NamedKind,
        story_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<LinkedName>>, sqlx::Error> {
        let t = tables(kind);
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT j.story_id, n.id, n.name, n.slug FROM {table} n \
             JOIN {join} j ON j.{col} = n.id \
             WHERE j.story_id IN (",
            table = t.table,
            join = t.join_table,
            col = t.join_column,
        ));
        let mut separated = builder.separated(", ");
        for id in story_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY n.name COLLATE NOCASE");

        let rows = builder
            .build_query_as::<StoryLinkRow>()
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<LinkedName>> = HashMap::new();
        for row in rows {
            grouped.entry(row.story_id).or_default().push(LinkedName {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }
        Ok(grouped)
    }
}
