//! Repository for the `actors` and `actor_images` tables.

use myficdb_core::naming::{normalize_upper, slug_base, NamedKind};
use myficdb_core::types::DbId;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbError;
use crate::models::actor::{
    Actor, ActorFields, ActorImage, ActorListItem, ImageChange, NewActorImage,
};
use crate::models::series::NameSuggestion;
use crate::repositories::named_repo;

/// Column list for `actors` queries.
const COLUMNS: &str = "id, name, normalized_name, slug, description, age, created_at, updated_at";

/// Column list for `actor_images` queries.
const IMAGE_COLUMNS: &str =
    "actor_id, data, content_type, file_name, sha256, created_at, updated_at";

/// Provides CRUD operations for actors and their portraits.
pub struct ActorRepo;

impl ActorRepo {
    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find an actor by slug (case-insensitive).
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE slug = lower(?)");
        sqlx::query_as::<_, Actor>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find an actor by normalized (upper-case) name.
    pub async fn find_by_normalized_name(
        pool: &SqlitePool,
        normalized: &str,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE normalized_name = ?");
        sqlx::query_as::<_, Actor>(&query)
            .bind(normalized)
            .fetch_optional(pool)
            .await
    }

    /// Total number of actors.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM actors")
            .fetch_one(pool)
            .await
    }

    /// One page of actors, newest first then by name.
    pub async fn list_page(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActorListItem>, sqlx::Error> {
        sqlx::query_as::<_, ActorListItem>(
            "SELECT a.id, a.name, a.slug, a.description, a.age, \
                    EXISTS (SELECT 1 FROM actor_images ai WHERE ai.actor_id = a.id) AS has_image, \
                    a.created_at \
             FROM actors a \
             ORDER BY a.created_at DESC, a.name \
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn story_count(pool: &SqlitePool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM story_actors WHERE actor_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn suggest(
        pool: &SqlitePool,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<NameSuggestion>, sqlx::Error> {
        let query = named_repo::suggest_query(NamedKind::Actor, "id, name");
        sqlx::query_as::<_, NameSuggestion>(&query)
            .bind(needle)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert an actor with a fresh slug and optional portrait in one
    /// transaction.
    pub async fn create(
        pool: &SqlitePool,
        fields: &ActorFields,
        image: Option<&NewActorImage>,
    ) -> Result<Actor, DbError> {
        let normalized = normalize_upper(&fields.name);
        let mut tx = pool.begin().await?;

        let slug = named_repo::allocate_slug(
            &mut tx,
            NamedKind::Actor,
            &slug_base(&normalized, NamedKind::Actor),
            None,
        )
        .await?;

        let query = format!(
            "INSERT INTO actors (name, normalized_name, slug, description, age) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(&fields.name)
            .bind(&normalized)
            .bind(&slug)
            .bind(&fields.description)
            .bind(fields.age)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(image) = image {
            Self::upsert_image(&mut tx, actor.id, image).await?;
        }

        tx.commit().await?;
        Ok(actor)
    }

    /// Rewrite an actor's fields and apply the portrait change in one
    /// transaction. The slug is regenerated only when the new name yields a
    /// different slug base.
    pub async fn update(
        pool: &SqlitePool,
        current: &Actor,
        fields: &ActorFields,
        image: &ImageChange,
    ) -> Result<Actor, DbError> {
        let normalized = normalize_upper(&fields.name);
        let base = slug_base(&normalized, NamedKind::Actor);
        let mut tx = pool.begin().await?;

        let slug = if current.slug.eq_ignore_ascii_case(&base) {
            current.slug.clone()
        } else {
            named_repo::allocate_slug(&mut tx, NamedKind::Actor, &base, Some(current.id)).await?
        };

        sqlx::query(
            "UPDATE actors SET name = ?, normalized_name = ?, slug = ?, description = ?, age = ? \
             WHERE id = ?",
        )
        .bind(&fields.name)
        .bind(&normalized)
        .bind(&slug)
        .bind(&fields.description)
        .bind(fields.age)
        .bind(current.id)
        .execute(&mut *tx)
        .await?;

        match image {
            ImageChange::Keep => {}
            ImageChange::Replace(new_image) => {
                Self::upsert_image(&mut tx, current.id, new_image).await?;
            }
            ImageChange::Remove => {
                sqlx::query("DELETE FROM actor_images WHERE actor_id = ?")
                    .bind(current.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = ?");
        let actor = sqlx::query_as::<_, Actor>(&query)
            .bind(current.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(actor)
    }

    /// Delete an actor. Restricted while stories still reference them; the
    /// portrait cascades.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Portraits
    // -----------------------------------------------------------------------

    /// Whether the actor has a stored portrait.
    pub async fn has_image(pool: &SqlitePool, actor_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM actor_images WHERE actor_id = ?)",
        )
        .bind(actor_id)
        .fetch_one(pool)
        .await
    }

    /// Load the stored portrait, if any.
    pub async fn find_image(
        pool: &SqlitePool,
        actor_id: DbId,
    ) -> Result<Option<ActorImage>, sqlx::Error> {
        let query = format!("SELECT {IMAGE_COLUMNS} FROM actor_images WHERE actor_id = ?");
        sqlx::query_as::<_, ActorImage>(&query)
            .bind(actor_id)
            .fetch_optional(pool)
            .await
    }

    async fn upsert_image(
        conn: &mut SqliteConnection,
        actor_id: DbId,
        image: &NewActorImage,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO actor_images (actor_id, data, content_type, file_name, sha256) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (actor_id) DO UPDATE SET \
                data = excluded.data, content_type = excluded.content_type, \
                file_name = excluded.file_name, sha256 = excluded.sha256",
        )
        .bind(actor_id)
        .bind(&image.data)
        .bind(&image.content_type)
        .bind(&image.file_name)
        .bind(&image.sha256)
        .execute(conn)
        .await?;
        Ok(())
    }
}
