//! Actor and actor portrait models.

use myficdb_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::story::StoryCard;

/// A row from the `actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub normalized_name: String,
    pub slug: String,
    pub description: Option<String>,
    pub age: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Actor row plus whether a portrait is stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActorListItem {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub age: Option<i64>,
    pub has_image: bool,
    pub created_at: Timestamp,
}

/// One page of actors.
#[derive(Debug, Clone, Serialize)]
pub struct ActorPage {
    pub items: Vec<ActorListItem>,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

/// Actor reference attached to a story.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LinkedActor {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub has_image: bool,
}

/// An actor with their stories.
#[derive(Debug, Clone, Serialize)]
pub struct ActorDetail {
    #[serde(flatten)]
    pub actor: Actor,
    pub has_image: bool,
    pub stories: Vec<StoryCard>,
}

/// A row from the `actor_images` table.
#[derive(Debug, Clone, FromRow)]
pub struct ActorImage {
    pub actor_id: DbId,
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
    pub sha256: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated actor columns written by create and update.
#[derive(Debug, Clone)]
pub struct ActorFields {
    pub name: String,
    pub description: Option<String>,
    pub age: Option<i64>,
}

/// Portrait bytes to store for an actor.
#[derive(Debug, Clone)]
pub struct NewActorImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
    pub sha256: String,
}

/// What to do with an actor's stored portrait on update.
#[derive(Debug, Clone)]
pub enum ImageChange {
    Keep,
    Replace(NewActorImage),
    Remove,
}
