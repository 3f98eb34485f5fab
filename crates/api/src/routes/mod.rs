pub mod actors;
pub mod auth;
pub mod health;
pub mod series;
pub mod stories;
pub mod system;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/status | register | login | refresh | logout
///
/// /stories                                   list, create
/// /stories/{id}                              get, update, delete
/// /stories/{id}/edit-form                    form values
/// /stories/{id}/nut | read                   counters
/// /stories/{id}/export/{type}                html | markdown download
/// /stories/{id}/chapters/...                 chapters and inline notes
///
/// /tags, /tags/{slug}                        list, detail, delete
/// /series, /series/{slug}                    list, detail, delete
/// /actors, /actors/{slug}                    CRUD (multipart)
/// /actors/{slug}/image                       portrait
///
/// /suggest/tags | series | actors            autocomplete
/// /search                                    global search
/// /db/health                                 latest health snapshot
///
/// /system/uptime | info | update             system page
/// /system/logs/{file}                        raw log text
/// /system/reset                              wipe everything
/// /system/database/download                  backup zip
/// /system/export                             export-all zip
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/stories", stories::router())
        .nest("/tags", tags::router())
        .nest("/series", series::router())
        .nest("/actors", actors::router())
        .nest("/suggest", system::suggest_router())
        .nest("/system", system::router())
        .merge(system::misc_router())
}
