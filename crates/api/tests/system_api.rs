//! HTTP-level integration tests for the system page endpoints.

mod common;

use std::io::{Cursor, Read};

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app_with_config, create_story, get_auth, post_auth,
    post_json_auth, register_and_login, test_config, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn uptime_is_human_readable(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let json = body_json(get_auth(app, "/api/v1/system/uptime", &token).await).await;
    let uptime = json["uptime"].as_str().unwrap();
    assert!(uptime.starts_with("0 Days, 0 Hours, 0 Minutes"), "{uptime}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn info_reports_totals_and_log_files(pool: SqlitePool) {
    let config = test_config();
    std::fs::write(config.logs_dir.join("myficdb.2026-01-01.log"), "hello").unwrap();
    std::fs::write(config.logs_dir.join("notes.txt"), "ignored").unwrap();
    let app = build_test_app_with_config(pool, config);
    let token = register_and_login(app.clone()).await;

    create_story(
        app.clone(),
        &token,
        json!({ "title": "Counted", "is_nsfw": true, "tags": "one, two" }),
    )
    .await;

    let json = body_json(get_auth(app, "/api/v1/system/info", &token).await).await;
    let data = &json["data"];
    assert_eq!(data["totals"]["stories"], 1);
    assert_eq!(data["totals"]["tags"], 2);
    assert_eq!(data["totals"]["nsfw_stories"], 1);
    assert_eq!(data["log_files"].as_array().unwrap().len(), 1);
    assert_eq!(data["log_files"][0]["name"], "myficdb.2026-01-01.log");
    assert_eq!(data["log_files"][0]["size_formatted"], "5 B");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn log_viewer_only_serves_log_files(pool: SqlitePool) {
    let config = test_config();
    std::fs::write(config.logs_dir.join("app.log"), "line one\nline two\n").unwrap();
    let app = build_test_app_with_config(pool, config);
    let token = register_and_login(app.clone()).await;

    let response = get_auth(app.clone(), "/api/v1/system/logs/app.log", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
    assert_eq!(body_bytes(response).await, b"line one\nline two\n");

    let response = get_auth(app.clone(), "/api/v1/system/logs/secrets.txt", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app.clone(), "/api/v1/system/logs/..%2Fescape.log", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, "/api/v1/system/logs/missing.log", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_check_reports_missing_build_info(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let response = get_auth(app, "/api/v1/system/update", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_update_available"], false);
    assert_eq!(json["data"]["latest_version"], "ERR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn db_health_is_empty_before_first_check(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let response = get_auth(app, "/api/v1/db/health", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn database_download_is_a_zip(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;

    let response = post_auth(app, "/api/v1/system/database/download", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/zip");
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("MyFicDB-Database-"));

    let bytes = body_bytes(response).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_index(0).unwrap();
    assert!(entry.name().ends_with(".sqlite"));
    let mut header = [0u8; 16];
    entry.read_exact(&mut header).unwrap();
    assert_eq!(&header, b"SQLite format 3\0");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_all_contains_every_story(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    let first = create_story(app.clone(), &token, json!({ "title": "First" })).await;
    let second = create_story(app.clone(), &token, json!({ "title": "Second" })).await;

    let response = post_auth(app, "/api/v1/system/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response).await;
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec![format!("First-{first}.html"), format!("Second-{second}.html")]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reset_requires_password_and_wipes_everything(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(app.clone()).await;
    create_story(app.clone(), &token, json!({ "title": "Ephemeral" })).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/system/reset",
        json!({ "password": "not it at all" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/system/reset",
        json!({ "password": TEST_PASSWORD }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The account is gone, so the old token no longer authenticates.
    let response = get_auth(app.clone(), "/api/v1/stories", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(common::get(app, "/api/v1/auth/status").await).await;
    assert_eq!(json["data"]["registered"], false);
}
