//! HTTP-level integration tests for stories: CRUD, relationship lists,
//! counters, paging and exports.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, create_story, delete_auth, get_auth, post_json_auth, put_json_auth,
    register_and_login,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_fetch_story(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let id = create_story(
        app.clone(),
        &token,
        json!({
            "title": "  The Long Night ",
            "summary": "<p>Dark <script>alert(1)</script>and stormy</p>",
            "notes": "   ",
            "tags": "Horror, mystery, horror",
            "series": "Night Tales",
            "actors": "Jane Doe",
        }),
    )
    .await;

    let response = get_auth(app, &format!("/api/v1/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["title"], "The Long Night");
    assert_eq!(data["is_own_work"], true);
    assert!(data["notes"].is_null());
    assert!(!data["summary"].as_str().unwrap().contains("script"));

    let tags: Vec<&str> = data["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["horror", "mystery"]);
    assert_eq!(data["series"][0]["name"], "Night Tales");
    assert_eq!(data["actors"][0]["name"], "Jane Doe");
    assert_eq!(data["actors"][0]["has_image"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_story_input_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/stories",
        json!({ "title": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/stories",
        json!({ "title": "x".repeat(51) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_many: Vec<String> = (0..31).map(|i| format!("tag{i}")).collect();
    let response = post_json_auth(
        app,
        "/api/v1/stories",
        json!({ "title": "Tagged", "tags": too_many.join(",") }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn edit_form_and_update_reconcile_links(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let id = create_story(
        app.clone(),
        &token,
        json!({ "title": "Links", "tags": "b-tag, a-tag" }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), &format!("/api/v1/stories/{id}/edit-form"), &token).await).await;
    assert_eq!(json["data"]["tags"], "a-tag, b-tag");

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/stories/{id}"),
        json!({ "title": "Links Renamed", "tags": "c-tag", "is_nsfw": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Links Renamed");
    assert_eq!(json["data"]["is_nsfw"], true);

    let json = body_json(get_auth(app, &format!("/api/v1/stories/{id}/edit-form"), &token).await).await;
    assert_eq!(json["data"]["tags"], "c-tag");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_story_then_404(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let id = create_story(app.clone(), &token, json!({ "title": "Doomed" })).await;

    let response = delete_auth(app.clone(), &format!("/api/v1/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/v1/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &format!("/api/v1/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn counters_move_by_one_and_stop_at_zero(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let id = create_story(app.clone(), &token, json!({ "title": "Counted" })).await;

    let nut = format!("/api/v1/stories/{id}/nut");
    let read = format!("/api/v1/stories/{id}/read");

    let json = body_json(post_json_auth(app.clone(), &nut, json!({ "delta": 1 }), &token).await).await;
    assert_eq!(json["data"]["nut_counter"], 1);

    let json = body_json(post_json_auth(app.clone(), &read, json!({ "delta": -1 }), &token).await).await;
    assert_eq!(json["data"]["read_counter"], 0);

    let response = post_json_auth(app, &nut, json!({ "delta": 5 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_pages_are_clamped(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    for i in 0..12 {
        create_story(app.clone(), &token, json!({ "title": format!("Story {i:02}") })).await;
    }

    let json = body_json(get_auth(app.clone(), "/api/v1/stories?page=1", &token).await).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["total_count"], 12);

    let json = body_json(get_auth(app, "/api/v1/stories?page=99", &token).await).await;
    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_as_html_and_markdown(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let id = create_story(app.clone(), &token, json!({ "title": "Exported" })).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/stories/{id}/chapters"),
        json!({ "number": 1, "title": "Opening", "body": "<p>Hello <strong>world</strong></p>" }),
        &token,
    )
    .await;

    let response = get_auth(app.clone(), &format!("/api/v1/stories/{id}/export/html"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains(&format!("Exported-{id}.html")));
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Opening"));

    let response = get_auth(app.clone(), &format!("/api/v1/stories/{id}/export/md"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let markdown = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(markdown.contains("**world**"));

    let response = get_auth(app, &format!("/api/v1/stories/{id}/export/pdf"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn huge_page_on_empty_library_is_an_empty_page(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let response = get_auth(app.clone(), "/api/v1/stories?page=9223372036854775807", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["total_pages"], 0);
    assert!(json["data"]["items"].as_array().unwrap().is_empty());

    let response = get_auth(app, "/api/v1/actors?page=9223372036854775807", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["items"].as_array().unwrap().is_empty());
}
