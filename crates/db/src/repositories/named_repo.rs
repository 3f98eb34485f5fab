//! Name resolution shared by tags, series and actors.
//!
//! The three tables have the same `name` / `normalized_name` / `slug`
//! shape, so lookups, slug allocation and create-on-demand live here and
//! take a [`NamedKind`] to pick the table.

use std::collections::HashSet;

use myficdb_core::naming::{normalize_upper, slug_base, slug_candidates, NamedKind};
use myficdb_core::types::DbId;
use sqlx::SqliteConnection;

use crate::error::DbError;

/// Table names backing one [`NamedKind`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamedTables {
    pub table: &'static str,
    pub join_table: &'static str,
    pub join_column: &'static str,
}

pub(crate) fn tables(kind: NamedKind) -> NamedTables {
    match kind {
        NamedKind::Tag => NamedTables {
            table: "tags",
            join_table: "story_tags",
            join_column: "tag_id",
        },
        NamedKind::Series => NamedTables {
            table: "series",
            join_table: "story_series",
            join_column: "series_id",
        },
        NamedKind::Actor => NamedTables {
            table: "actors",
            join_table: "story_actors",
            join_column: "actor_id",
        },
    }
}

/// Autocomplete query over one named table.
///
/// Binds `?1` to the upper-cased needle and `?2` to the limit. Uses
/// `instr` rather than `LIKE` so `%` and `_` in the needle match literally.
pub(crate) fn suggest_query(kind: NamedKind, columns: &str) -> String {
    format!(
        "SELECT {columns} FROM {table} \
         WHERE instr(normalized_name, ?1) > 0 \
         ORDER BY (substr(normalized_name, 1, length(?1)) = ?1) DESC, name \
         LIMIT ?2",
        table = tables(kind).table,
    )
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Find the id of the row whose normalized name equals `normalized`.
pub(crate) async fn find_id_by_normalized(
    conn: &mut SqliteConnection,
    kind: NamedKind,
    normalized: &str,
) -> Result<Option<DbId>, sqlx::Error> {
    let query = format!(
        "SELECT id FROM {} WHERE normalized_name = ?",
        tables(kind).table
    );
    sqlx::query_scalar::<_, DbId>(&query)
        .bind(normalized)
        .fetch_optional(conn)
        .await
}

/// Pick the first unused slug among `base`, `base-2`, ... ignoring the row
/// `exclude_id` (the row being renamed).
pub(crate) async fn allocate_slug(
    conn: &mut SqliteConnection,
    kind: NamedKind,
    base: &str,
    exclude_id: Option<DbId>,
) -> Result<String, DbError> {
    let query = format!(
        "SELECT id FROM {} WHERE slug = ?1 AND (?2 IS NULL OR id <> ?2)",
        tables(kind).table
    );
    for candidate in slug_candidates(base) {
        let taken = sqlx::query_scalar::<_, DbId>(&query)
            .bind(&candidate)
            .bind(exclude_id)
            .fetch_optional(&mut *conn)
            .await?;
        if taken.is_none() {
            return Ok(candidate);
        }
    }
    Err(DbError::SlugExhausted {
        kind,
        base: base.to_string(),
    })
}

/// Resolve cleaned names to ids, inserting a row for every unknown
/// normalized name.
///
/// A unique violation on insert means another writer created the same
/// name first; the row is then re-read by its normalized name.
pub(crate) async fn resolve_ids(
    conn: &mut SqliteConnection,
    kind: NamedKind,
    names: &[String],
) -> Result<Vec<DbId>, DbError> {
    let insert = format!(
        "INSERT INTO {} (name, normalized_name, slug) VALUES (?, ?, ?) RETURNING id",
        tables(kind).table
    );

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let normalized = normalize_upper(name);
        if let Some(id) = find_id_by_normalized(&mut *conn, kind, &normalized).await? {
            ids.push(id);
            continue;
        }

        let slug = allocate_slug(&mut *conn, kind, &slug_base(&normalized, kind), None).await?;
        let inserted = sqlx::query_scalar::<_, DbId>(&insert)
            .bind(kind.stored_name(name))
            .bind(&normalized)
            .bind(&slug)
            .fetch_one(&mut *conn)
            .await;

        match inserted {
            Ok(id) => {
                tracing::debug!(id, kind = kind.label(), name = %name, slug = %slug, "Created on demand");
                ids.push(id);
            }
            Err(err) if is_unique_violation(&err) => {
                match find_id_by_normalized(&mut *conn, kind, &normalized).await? {
                    Some(id) => ids.push(id),
                    None => return Err(err.into()),
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(*id));
    Ok(ids)
}
