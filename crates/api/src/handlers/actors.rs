//! Handlers for the `/actors` resource.
//!
//! Create and update take `multipart/form-data` so a portrait can travel
//! with the text fields. Portraits are stored in the database and served
//! from `/actors/{slug}/image` with an entity tag.

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use myficdb_core::actor_image::{
    image_etag, ValidatedImage, PLACEHOLDER_CONTENT_TYPE, PLACEHOLDER_ETAG, PLACEHOLDER_SVG,
};
use myficdb_core::error::CoreError;
use myficdb_core::naming::{clean_display_name, normalize_upper};
use myficdb_core::story::{page_window, validate_actor_fields, ACTOR_PAGE_SIZE};
use myficdb_db::models::actor::{
    Actor, ActorDetail, ActorFields, ActorPage, ImageChange, NewActorImage,
};
use myficdb_db::repositories::{ActorRepo, StoryRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Browser cache policy for portraits and the placeholder.
const IMAGE_CACHE_CONTROL: &str = "private, max-age=300";

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

/// Fields of the actor create / edit form.
#[derive(Debug, Default)]
struct ActorForm {
    name: String,
    description: Option<String>,
    age: Option<i64>,
    image: Option<ValidatedImage>,
    remove_image: bool,
}

impl ActorForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = ActorForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "image" => {
                    let content_type = field.content_type().map(str::to_string);
                    let file_name = field.file_name().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.image = ValidatedImage::from_upload(
                        data.to_vec(),
                        content_type.as_deref(),
                        file_name.as_deref(),
                    )?;
                }
                "name" | "description" | "age" | "remove_image" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    match name.as_str() {
                        "name" => form.name = text,
                        "description" => form.description = Some(text),
                        "age" => form.age = parse_age(&text)?,
                        _ => form.remove_image = parse_flag(&text),
                    }
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown actor form field");
                }
            }
        }

        Ok(form)
    }

    /// Clean and validate the text fields into storable columns.
    fn fields(&self) -> Result<ActorFields, CoreError> {
        let name = clean_display_name(&self.name);
        let description = validate_actor_fields(&name, self.description.as_deref(), self.age)?;
        Ok(ActorFields {
            name,
            description,
            age: self.age,
        })
    }
}

fn parse_age(raw: &str) -> Result<Option<i64>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("Age '{raw}' is not a whole number")))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn to_new_image(image: ValidatedImage) -> NewActorImage {
    NewActorImage {
        data: image.data,
        content_type: image.content_type,
        file_name: image.file_name,
        sha256: image.sha256,
    }
}

async fn load_actor(state: &AppState, slug: &str) -> AppResult<Actor> {
    ActorRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Actor",
                slug: slug.to_string(),
            })
        })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/actors?page=
pub async fn list_actors(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let total = ActorRepo::count(&state.pool).await?;
    let window = page_window(params.page, total, ACTOR_PAGE_SIZE);
    let items = ActorRepo::list_page(&state.pool, window.limit, window.offset).await?;

    Ok(Json(DataResponse {
        data: ActorPage {
            items,
            page: window.page,
            total_pages: window.total_pages,
            total_count: total,
        },
    }))
}

/// POST /api/v1/actors (multipart)
///
/// An actor whose normalized name already exists is returned as is with
/// 200 OK; nothing is written.
pub async fn create_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Actor>>)> {
    let form = ActorForm::read(multipart).await?;
    let fields = form.fields()?;

    let normalized = normalize_upper(&fields.name);
    if let Some(existing) = ActorRepo::find_by_normalized_name(&state.pool, &normalized).await? {
        tracing::debug!(actor_id = existing.id, "Actor already exists, returning it");
        return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
    }

    let image = form.image.map(to_new_image);
    let actor = ActorRepo::create(&state.pool, &fields, image.as_ref()).await?;

    tracing::info!(
        actor_id = actor.id,
        slug = %actor.slug,
        with_image = image.is_some(),
        user_id = auth.user_id,
        "Actor created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: actor })))
}

/// GET /api/v1/actors/{slug}
pub async fn get_actor(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let actor = load_actor(&state, &slug).await?;
    let has_image = ActorRepo::has_image(&state.pool, actor.id).await?;
    let stories = StoryRepo::cards_for_actor(&state.pool, actor.id).await?;

    Ok(Json(DataResponse {
        data: ActorDetail {
            actor,
            has_image,
            stories,
        },
    }))
}

/// PUT /api/v1/actors/{slug} (multipart)
///
/// A new `image` replaces the stored portrait; otherwise `remove_image=true`
/// deletes it. Renaming onto another actor's name is a conflict.
pub async fn update_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let current = load_actor(&state, &slug).await?;
    let form = ActorForm::read(multipart).await?;
    let fields = form.fields()?;

    let normalized = normalize_upper(&fields.name);
    if let Some(other) = ActorRepo::find_by_normalized_name(&state.pool, &normalized).await? {
        if other.id != current.id {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Another actor is already named '{}'",
                other.name
            ))));
        }
    }

    let change = match form.image {
        Some(image) => ImageChange::Replace(to_new_image(image)),
        None if form.remove_image => ImageChange::Remove,
        None => ImageChange::Keep,
    };

    let actor = ActorRepo::update(&state.pool, &current, &fields, &change).await?;

    tracing::info!(
        actor_id = actor.id,
        slug = %actor.slug,
        user_id = auth.user_id,
        "Actor updated"
    );

    Ok(Json(DataResponse { data: actor }))
}

/// DELETE /api/v1/actors/{slug}
pub async fn delete_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let actor = load_actor(&state, &slug).await?;

    let linked = ActorRepo::story_count(&state.pool, actor.id).await?;
    if linked > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Actor '{}' still appears in {linked} stories",
            actor.name
        ))));
    }

    ActorRepo::delete(&state.pool, actor.id).await?;
    tracing::info!(actor_id = actor.id, user_id = auth.user_id, "Actor deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Portrait
// ---------------------------------------------------------------------------

/// Whether an `If-None-Match` header value matches `etag`.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// GET /api/v1/actors/{slug}/image
///
/// Serves the stored portrait, or an SVG placeholder when there is none.
/// Answers 304 when the client already holds the current version.
pub async fn get_actor_image(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let actor = load_actor(&state, &slug).await?;
    let image = ActorRepo::find_image(&state.pool, actor.id).await?;

    let etag = match &image {
        Some(image) => image_etag(image.sha256.as_deref(), image.data.len()),
        None => PLACEHOLDER_ETAG.to_string(),
    };

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));
    if not_modified {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, etag),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
            ],
        )
            .into_response());
    }

    let response = match image {
        Some(image) => (
            [
                (header::CONTENT_TYPE, image.content_type),
                (header::ETAG, etag),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
            ],
            Body::from(image.data),
        )
            .into_response(),
        None => (
            [
                (header::CONTENT_TYPE, PLACEHOLDER_CONTENT_TYPE.to_string()),
                (header::ETAG, etag),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            ],
            PLACEHOLDER_SVG,
        )
            .into_response(),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_none_match_handles_lists_and_weak_tags() {
        assert!(etag_matches("\"abc\"", "\"abc\""));
        assert!(etag_matches("\"x\", W/\"abc\"", "\"abc\""));
        assert!(etag_matches("*", "\"abc\""));
        assert!(!etag_matches("\"abd\"", "\"abc\""));
    }

    #[test]
    fn age_parsing() {
        assert_eq!(parse_age("").unwrap(), None);
        assert_eq!(parse_age(" 31 ").unwrap(), Some(31));
        assert!(parse_age("thirty").is_err());
    }

    #[test]
    fn remove_image_flag_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag("on"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
