//! Handlers for the system page: uptime, library totals, log files,
//! update check, database health, backups, export and full reset.

use std::path::Path as FsPath;
use std::time::SystemTime;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use myficdb_core::error::CoreError;
use myficdb_core::export::{archive_file_name, render_html_archive, ZIP_CONTENT_TYPE};
use myficdb_core::paths::contained_file;
use myficdb_core::text::{format_file_size, format_uptime};
use myficdb_core::types::Timestamp;
use myficdb_db::models::story::LibraryTotals;
use myficdb_db::repositories::{ExportRepo, SystemRepo, UserRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::password::verify_password;
use crate::backup::create_database_backup;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{Attachment, DataResponse};
use crate::state::AppState;

/// Number of log files listed on the system page.
const LOG_FILES_SHOWN: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file in the logs directory.
#[derive(Debug, Serialize)]
pub struct LogFileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub size_formatted: String,
    pub modified_utc: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub totals: LibraryTotals,
    pub started_at_utc: Timestamp,
    pub uptime: String,
    pub log_files: Vec<LogFileInfo>,
}

/// Request body for `POST /system/reset`.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn uptime_text(state: &AppState) -> String {
    let elapsed = (Utc::now() - state.started_at).to_std().unwrap_or_default();
    format_uptime(elapsed)
}

fn is_log_file(name: &str) -> bool {
    FsPath::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("log"))
}

/// The newest `*.log` files in `dir`, most recently modified first.
async fn newest_log_files(dir: &FsPath, limit: usize) -> std::io::Result<Vec<LogFileInfo>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files: Vec<(SystemTime, LogFileInfo)> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_log_file(&name) {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().ok();
        files.push((
            modified.unwrap_or(SystemTime::UNIX_EPOCH),
            LogFileInfo {
                name,
                size_bytes: meta.len(),
                size_formatted: format_file_size(meta.len()),
                modified_utc: modified.map(DateTime::<Utc>::from),
            },
        ));
    }

    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
    Ok(files.into_iter().take(limit).map(|(_, info)| info).collect())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/system/uptime
pub async fn uptime(_auth: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "uptime": uptime_text(&state) }))
}

/// GET /api/v1/system/info
pub async fn info(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SystemInfo>>> {
    let totals = SystemRepo::totals(&state.pool).await?;
    let log_files = newest_log_files(&state.config.logs_dir, LOG_FILES_SHOWN)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to list log files: {e}")))?;

    Ok(Json(DataResponse {
        data: SystemInfo {
            totals,
            started_at_utc: state.started_at,
            uptime: uptime_text(&state),
            log_files,
        },
    }))
}

/// GET /api/v1/system/update
///
/// Never fails: lookup problems are reported inside the payload.
pub async fn update(_auth: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    let info = state.updates.latest().await;
    Json(DataResponse { data: info })
}

/// GET /api/v1/system/logs/{file}
///
/// Raw text of one log file from the logs directory.
pub async fn read_log(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<Response> {
    if !is_log_file(&file) {
        return Err(AppError::BadRequest("Only .log files can be viewed".into()));
    }
    let path = contained_file(&state.config.logs_dir, &file)?;

    let text = match tokio::fs::read(&path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::SlugNotFound {
                entity: "Log file",
                slug: file,
            }));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!("Failed to read log file: {e}")));
        }
    };

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}

/// GET /api/v1/db/health
///
/// 204 until the first background check has completed.
pub async fn db_health(_auth: AuthUser, State(state): State<AppState>) -> Response {
    match state.health.current().await {
        Some(snapshot) => Json(DataResponse { data: snapshot }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// POST /api/v1/system/database/download
pub async fn download_database(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Attachment> {
    let archive = create_database_backup(&state.pool, Utc::now()).await?;
    tracing::info!(user_id = auth.user_id, file_name = %archive.file_name, "Database downloaded");

    Ok(Attachment {
        file_name: archive.file_name,
        content_type: ZIP_CONTENT_TYPE,
        bytes: archive.bytes,
    })
}

/// POST /api/v1/system/export
///
/// Every story rendered as HTML, zipped.
pub async fn export_all(auth: AuthUser, State(state): State<AppState>) -> AppResult<Attachment> {
    let stories = ExportRepo::load_all(&state.pool).await?;
    let story_count = stories.len();

    let bytes = tokio::task::spawn_blocking(move || render_html_archive(&stories))
        .await
        .map_err(|e| AppError::InternalError(format!("Export task failed: {e}")))??;

    tracing::info!(user_id = auth.user_id, story_count, "Library exported");

    Ok(Attachment {
        file_name: archive_file_name(Utc::now()),
        content_type: ZIP_CONTENT_TYPE,
        bytes,
    })
}

/// POST /api/v1/system/reset
///
/// Wipes every table, including the account and its sessions. Requires the
/// current password.
pub async fn reset(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ResetRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Forbidden(
            "Password is incorrect".into(),
        )));
    }

    SystemRepo::reset_all(&state.pool).await?;
    tracing::warn!(user_id = auth.user_id, "System reset: all data removed");

    Ok(StatusCode::NO_CONTENT)
}
