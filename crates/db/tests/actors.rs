//! Integration tests for actors, portraits and autocomplete.

use myficdb_db::models::actor::{ActorFields, ImageChange, NewActorImage};
use myficdb_db::models::story::StoryFields;
use myficdb_db::repositories::{ActorRepo, SeriesRepo, StoryLinks, StoryRepo, TagRepo};
use sqlx::SqlitePool;

fn actor(name: &str) -> ActorFields {
    ActorFields {
        name: name.to_string(),
        description: Some("Companion".to_string()),
        age: Some(25),
    }
}

fn image(bytes: &[u8]) -> NewActorImage {
    NewActorImage {
        data: bytes.to_vec(),
        content_type: "image/png".to_string(),
        file_name: Some("portrait.png".to_string()),
        sha256: myficdb_core::hashing::sha256_hex(bytes),
    }
}

fn story(title: &str) -> StoryFields {
    StoryFields {
        title: title.to_string(),
        summary: None,
        notes: None,
        is_own_work: true,
        is_ai_generated: false,
        is_nsfw: false,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_image(pool: SqlitePool) {
    let created = ActorRepo::create(&pool, &actor("Clara Oswald"), Some(&image(&[1, 2, 3])))
        .await
        .unwrap();
    assert_eq!(created.slug, "clara-oswald");
    assert_eq!(created.normalized_name, "CLARA OSWALD");
    assert!(ActorRepo::has_image(&pool, created.id).await.unwrap());

    let stored = ActorRepo::find_image(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.data, vec![1, 2, 3]);
    assert_eq!(stored.content_type, "image/png");

    let by_slug = ActorRepo::find_by_slug(&pool, "CLARA-OSWALD").await.unwrap();
    assert_eq!(by_slug.map(|a| a.id), Some(created.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_keeps_slug_when_base_unchanged(pool: SqlitePool) {
    let created = ActorRepo::create(&pool, &actor("Donna"), None).await.unwrap();

    let updated = ActorRepo::update(&pool, &created, &actor("DONNA"), &ImageChange::Keep)
        .await
        .unwrap();
    assert_eq!(updated.slug, "donna");
    assert_eq!(updated.name, "DONNA");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rename_regenerates_unique_slug(pool: SqlitePool) {
    ActorRepo::create(&pool, &actor("Martha"), None).await.unwrap();
    let other = ActorRepo::create(&pool, &actor("Mickey"), None).await.unwrap();

    let renamed = ActorRepo::update(&pool, &other, &actor("Martha!"), &ImageChange::Keep)
        .await
        .unwrap();
    assert_eq!(renamed.slug, "martha-2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_image_replace_and_remove(pool: SqlitePool) {
    let created = ActorRepo::create(&pool, &actor("Jack"), Some(&image(&[9])))
        .await
        .unwrap();

    let replaced = ImageChange::Replace(image(&[7, 7]));
    ActorRepo::update(&pool, &created, &actor("Jack"), &replaced)
        .await
        .unwrap();
    let stored = ActorRepo::find_image(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.data, vec![7, 7]);

    ActorRepo::update(&pool, &created, &actor("Jack"), &ImageChange::Remove)
        .await
        .unwrap();
    assert!(!ActorRepo::has_image(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_linked_actor_delete_restricted(pool: SqlitePool) {
    let s = StoryRepo::create(
        &pool,
        &story("Linked"),
        &StoryLinks {
            actors: Some("River"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let river = ActorRepo::find_by_slug(&pool, "river").await.unwrap().unwrap();
    assert_eq!(ActorRepo::story_count(&pool, river.id).await.unwrap(), 1);
    assert!(ActorRepo::delete(&pool, river.id).await.is_err());

    StoryRepo::delete(&pool, s.id).await.unwrap();
    assert!(ActorRepo::delete(&pool, river.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_page_reports_images(pool: SqlitePool) {
    ActorRepo::create(&pool, &actor("With"), Some(&image(&[1]))).await.unwrap();
    ActorRepo::create(&pool, &actor("Without"), None).await.unwrap();

    let page = ActorRepo::list_page(&pool, 20, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(ActorRepo::count(&pool).await.unwrap(), 2);
    let with = page.iter().find(|a| a.name == "With").unwrap();
    let without = page.iter().find(|a| a.name == "Without").unwrap();
    assert!(with.has_image);
    assert!(!without.has_image);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_suggest_prefers_prefix_matches(pool: SqlitePool) {
    StoryRepo::create(
        &pool,
        &story("Suggest"),
        &StoryLinks {
            tags: Some("slow burn, burns, angst"),
            series: Some("Burning Bridges, The Burn"),
            actors: Some("Bernard, Burnell"),
        },
    )
    .await
    .unwrap();

    let tags = TagRepo::suggest(&pool, "BURN", 10).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["burns", "slow burn"]);

    let series = SeriesRepo::suggest(&pool, "BURN", 1).await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].name, "Burning Bridges");

    let actors = ActorRepo::suggest(&pool, "BURN", 10).await.unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0].name, "Burnell");
}
