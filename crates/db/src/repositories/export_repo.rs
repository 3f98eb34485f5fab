//! Loads stories as export aggregates.

use myficdb_core::export::{ChapterAggregate, StoryAggregate};
use myficdb_core::naming::NamedKind;
use myficdb_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::story::Story;
use crate::repositories::chapter_repo::ChapterRepo;
use crate::repositories::story_link_repo::StoryLinkRepo;
use crate::repositories::story_repo::StoryRepo;

/// Builds [`StoryAggregate`]s for the export renderer.
pub struct ExportRepo;

impl ExportRepo {
    /// Load one story as an aggregate.
    pub async fn load_story(
        pool: &SqlitePool,
        story_id: DbId,
    ) -> Result<Option<StoryAggregate>, sqlx::Error> {
        match StoryRepo::find_by_id(pool, story_id).await? {
            Some(story) => Ok(Some(Self::aggregate(pool, story).await?)),
            None => Ok(None),
        }
    }

    /// Load every story, oldest first.
    pub async fn load_all(pool: &SqlitePool) -> Result<Vec<StoryAggregate>, sqlx::Error> {
        let ids = sqlx::query_scalar::<_, DbId>("SELECT id FROM stories ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;

        let mut aggregates = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(aggregate) = Self::load_story(pool, id).await? {
                aggregates.push(aggregate);
            }
        }
        Ok(aggregates)
    }

    async fn aggregate(pool: &SqlitePool, story: Story) -> Result<StoryAggregate, sqlx::Error> {
        let actors = StoryLinkRepo::names_for_story(pool, story.id, NamedKind::Actor).await?;
        let tags = StoryLinkRepo::names_for_story(pool, story.id, NamedKind::Tag).await?;
        let chapters = ChapterRepo::list_with_content(pool, story.id).await?;

        Ok(StoryAggregate::new(
            story.id,
            story.title,
            story.created_at,
            story.summary,
            actors.into_iter().map(|a| a.name).collect(),
            tags.into_iter().map(|t| t.name).collect(),
            chapters
                .into_iter()
                .map(|c| ChapterAggregate {
                    number: c.number,
                    title: c.title,
                    body: c.body,
                })
                .collect(),
        ))
    }
}
