//! Integration tests for story persistence and relationship reconciliation.
//!
//! Exercises the repository layer against a fresh SQLite database:
//! - Create with tags / series / actors created on demand
//! - Reconcile on update (extras removed, missing added)
//! - Cascade delete of chapters and join rows
//! - Counter updates leave `updated_at` alone
//! - Card listings and global search

use myficdb_core::naming::NamedKind;
use myficdb_db::models::chapter::ChapterFields;
use myficdb_db::models::story::StoryFields;
use myficdb_db::repositories::{
    ChapterRepo, StoryCounter, StoryLinkRepo, StoryLinks, StoryRepo, TagRepo,
};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fields(title: &str) -> StoryFields {
    StoryFields {
        title: title.to_string(),
        summary: Some("<p>A <em>short</em> summary.</p>".to_string()),
        notes: None,
        is_own_work: true,
        is_ai_generated: false,
        is_nsfw: false,
    }
}

fn chapter(number: i64, body: &str) -> ChapterFields {
    ChapterFields {
        number,
        title: None,
        body: body.to_string(),
        word_count: myficdb_core::text::count_words(body),
    }
}

async fn link_names(pool: &SqlitePool, story_id: i64, kind: NamedKind) -> Vec<String> {
    StoryLinkRepo::names_for_story(pool, story_id, kind)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect()
}

// ---------------------------------------------------------------------------
// Create / reconcile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_links_names_on_demand(pool: SqlitePool) {
    let links = StoryLinks {
        tags: Some(" Angst, Hurt  Comfort ,angst"),
        series: Some("Doctor Who"),
        actors: Some("Amy Pond, Rory"),
    };
    let story = StoryRepo::create(&pool, &fields("The Long Way"), &links)
        .await
        .unwrap();

    assert_eq!(
        link_names(&pool, story.id, NamedKind::Tag).await,
        vec!["angst", "hurt comfort"]
    );
    assert_eq!(link_names(&pool, story.id, NamedKind::Series).await, vec!["Doctor Who"]);
    assert_eq!(link_names(&pool, story.id, NamedKind::Actor).await, vec!["Amy Pond", "Rory"]);

    let tag = TagRepo::find_by_slug(&pool, "hurt-comfort").await.unwrap().unwrap();
    assert_eq!(tag.normalized_name, "HURT COMFORT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_existing_names_are_reused(pool: SqlitePool) {
    let first = StoryLinks {
        tags: Some("Fluff"),
        ..Default::default()
    };
    let second = StoryLinks {
        tags: Some("FLUFF"),
        ..Default::default()
    };
    StoryRepo::create(&pool, &fields("One"), &first).await.unwrap();
    StoryRepo::create(&pool, &fields("Two"), &second).await.unwrap();

    let tags = TagRepo::list_with_counts(&pool).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "fluff");
    assert_eq!(tags[0].story_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_slug_collisions_get_numeric_suffix(pool: SqlitePool) {
    let links = StoryLinks {
        tags: Some("C++, C, !!!"),
        ..Default::default()
    };
    StoryRepo::create(&pool, &fields("Slugs"), &links).await.unwrap();

    let mut slugs: Vec<String> = TagRepo::list_with_counts(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.slug)
        .collect();
    slugs.sort();
    assert_eq!(slugs, vec!["c", "c-2", "tag"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_reconciles_links(pool: SqlitePool) {
    let story = StoryRepo::create(
        &pool,
        &fields("Reconcile"),
        &StoryLinks {
            tags: Some("a1, b2"),
            series: Some("First"),
            actors: None,
        },
    )
    .await
    .unwrap();

    let updated = StoryRepo::update(
        &pool,
        story.id,
        &fields("Reconciled"),
        &StoryLinks {
            tags: Some("b2, c3"),
            series: None,
            actors: Some("Jo"),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Reconciled");
    assert_eq!(link_names(&pool, story.id, NamedKind::Tag).await, vec!["b2", "c3"]);
    assert!(link_names(&pool, story.id, NamedKind::Series).await.is_empty());
    assert_eq!(link_names(&pool, story.id, NamedKind::Actor).await, vec!["Jo"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_story_returns_none(pool: SqlitePool) {
    let result = StoryRepo::update(&pool, 999, &fields("Nope"), &StoryLinks::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete / restrict
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_story_cascades(pool: SqlitePool) {
    let story = StoryRepo::create(
        &pool,
        &fields("Cascade"),
        &StoryLinks {
            tags: Some("gone"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let ch = ChapterRepo::create(&pool, story.id, &chapter(1, "<p>one two</p>"))
        .await
        .unwrap();
    ChapterRepo::create_note(&pool, ch.id, "note").await.unwrap();

    assert!(StoryRepo::delete(&pool, story.id).await.unwrap());
    assert!(!StoryRepo::delete(&pool, story.id).await.unwrap());

    let chapters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters")
        .fetch_one(&pool)
        .await
        .unwrap();
    let contents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapter_contents")
        .fetch_one(&pool)
        .await
        .unwrap();
    let notes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapter_inline_notes")
        .fetch_one(&pool)
        .await
        .unwrap();
    let joins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM story_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((chapters, contents, notes, joins), (0, 0, 0, 0));

    // The tag itself survives and can now be deleted.
    let tag = TagRepo::find_by_slug(&pool, "gone").await.unwrap().unwrap();
    assert!(TagRepo::delete(&pool, tag.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_linked_tag_is_restricted(pool: SqlitePool) {
    StoryRepo::create(
        &pool,
        &fields("Restrict"),
        &StoryLinks {
            tags: Some("kept"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let tag = TagRepo::find_by_slug(&pool, "kept").await.unwrap().unwrap();

    let err = TagRepo::delete(&pool, tag.id).await.unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert!(db.is_foreign_key_violation()),
        other => panic!("expected foreign key violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_counters_do_not_touch_updated_at(pool: SqlitePool) {
    let story = StoryRepo::create(&pool, &fields("Counters"), &StoryLinks::default())
        .await
        .unwrap();

    let nut = StoryRepo::set_counter(&pool, story.id, StoryCounter::Nut, 3)
        .await
        .unwrap();
    let read = StoryRepo::set_counter(&pool, story.id, StoryCounter::Read, 1)
        .await
        .unwrap();
    assert_eq!((nut, read), (Some(3), Some(1)));

    let reloaded = StoryRepo::find_by_id(&pool, story.id).await.unwrap().unwrap();
    assert_eq!(reloaded.nut_counter, 3);
    assert_eq!(reloaded.read_counter, 1);
    assert_eq!(reloaded.updated_at, story.updated_at);

    let missing = StoryRepo::set_counter(&pool, 999, StoryCounter::Nut, 1)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_negative_counter_rejected_by_schema(pool: SqlitePool) {
    let story = StoryRepo::create(&pool, &fields("Check"), &StoryLinks::default())
        .await
        .unwrap();
    assert!(StoryRepo::set_counter(&pool, story.id, StoryCounter::Read, -1)
        .await
        .is_err());
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cards_carry_aggregates_and_sorted_links(pool: SqlitePool) {
    let story = StoryRepo::create(
        &pool,
        &fields("Cards"),
        &StoryLinks {
            tags: Some("zeta, alpha"),
            series: Some("Saga"),
            actors: None,
        },
    )
    .await
    .unwrap();
    ChapterRepo::create(&pool, story.id, &chapter(1, "<p>one two three</p>"))
        .await
        .unwrap();
    ChapterRepo::create(&pool, story.id, &chapter(2, "<p>four five</p>"))
        .await
        .unwrap();

    let cards = StoryRepo::list_cards(&pool, 10, 0).await.unwrap();
    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.chapter_count, 2);
    assert_eq!(card.total_words, 5);
    assert_eq!(card.summary.as_deref(), Some("A short summary."));
    let tags: Vec<&str> = card.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["alpha", "zeta"]);
    assert_eq!(card.series[0].name, "Saga");
    assert_eq!(StoryRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_matches_linked_names(pool: SqlitePool) {
    StoryRepo::create(
        &pool,
        &fields("Bravo"),
        &StoryLinks {
            actors: Some("Rose Tyler"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    StoryRepo::create(&pool, &fields("Alpha Rose"), &StoryLinks::default())
        .await
        .unwrap();
    StoryRepo::create(&pool, &fields("Unrelated"), &StoryLinks::default())
        .await
        .unwrap();

    let pattern = myficdb_core::search::fuzzy_like_pattern("rose").unwrap();
    let hits = StoryRepo::search_cards(&pool, &pattern, 10).await.unwrap();
    let titles: Vec<&str> = hits.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha Rose", "Bravo"]);

    let pattern = myficdb_core::search::fuzzy_like_pattern("rose tyl").unwrap();
    let hits = StoryRepo::search_cards(&pool, &pattern, 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Bravo");
}
