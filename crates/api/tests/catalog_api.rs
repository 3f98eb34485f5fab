//! HTTP-level integration tests for tags, series, suggestions and search.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_story, delete_auth, get_auth, put_json_auth, register_and_login,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn tags_list_detail_and_guarded_delete(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let story = create_story(
        app.clone(),
        &token,
        json!({ "title": "Tagged", "tags": "Slow Burn, angst" }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/v1/tags", &token).await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["angst", "slow burn"]);
    assert_eq!(json["data"][1]["story_count"], 1);

    let response = get_auth(app.clone(), "/api/v1/tags/SLOW-BURN", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "slow-burn");
    assert_eq!(json["data"]["stories"][0]["id"], story);

    let response = delete_auth(app.clone(), "/api/v1/tags/slow-burn", &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    put_json_auth(
        app.clone(),
        &format!("/api/v1/stories/{story}"),
        json!({ "title": "Tagged", "tags": "angst" }),
        &token,
    )
    .await;

    let response = delete_auth(app.clone(), "/api/v1/tags/slow-burn", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/tags/slow-burn", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn series_list_detail_and_guarded_delete(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let story = create_story(
        app.clone(),
        &token,
        json!({ "title": "Part One", "series": "The Saga" }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/v1/series", &token).await).await;
    assert_eq!(json["data"][0]["name"], "The Saga");
    assert_eq!(json["data"][0]["story_count"], 1);

    let json = body_json(get_auth(app.clone(), "/api/v1/series/the-saga", &token).await).await;
    assert_eq!(json["data"]["stories"][0]["title"], "Part One");

    let response = delete_auth(app.clone(), "/api/v1/series/the-saga", &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    delete_auth(app.clone(), &format!("/api/v1/stories/{story}"), &token).await;

    let response = delete_auth(app, "/api/v1/series/the-saga", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn suggestions_prefer_prefix_matches(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    create_story(
        app.clone(),
        &token,
        json!({
            "title": "Suggestible",
            "tags": "romance, drama, dark romance",
            "series": "Romance Chronicles",
            "actors": "Roman Reigns, Ann Roman",
        }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/v1/suggest/tags?query=rom", &token).await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["romance", "dark romance"]);
    assert!(json["data"][0]["slug"].is_string());

    let json = body_json(get_auth(app.clone(), "/api/v1/suggest/series?query=chron", &token).await).await;
    assert_eq!(json["data"][0]["name"], "Romance Chronicles");
    assert!(json["data"][0].get("slug").is_none());

    let json = body_json(get_auth(app.clone(), "/api/v1/suggest/actors?query=roman&limit=1", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Roman Reigns");

    let json = body_json(get_auth(app, "/api/v1/suggest/tags?query=r", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn search_matches_titles_and_linked_names(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    create_story(app.clone(), &token, json!({ "title": "Doctor of Time" })).await;
    create_story(
        app.clone(),
        &token,
        json!({ "title": "Another Tale", "actors": "The Doctor" }),
    )
    .await;
    create_story(app.clone(), &token, json!({ "title": "Unrelated" })).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/search?query=doctor", &token).await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Another Tale", "Doctor of Time"]);

    let json = body_json(get_auth(app.clone(), "/api/v1/search?query=doctor%20time", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(get_auth(app, "/api/v1/search?query=%20%20", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
