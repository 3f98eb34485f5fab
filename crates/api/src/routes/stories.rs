//! Route definitions for stories and their chapters.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{chapters, stories};
use crate::state::AppState;

/// Routes mounted at `/stories`.
///
/// ```text
/// GET    /                                    -> list_stories
/// POST   /                                    -> create_story
/// GET    /{id}                                -> get_story
/// PUT    /{id}                                -> update_story
/// DELETE /{id}                                -> delete_story
/// GET    /{id}/edit-form                      -> get_edit_form
/// POST   /{id}/nut                            -> bump_nut
/// POST   /{id}/read                           -> bump_read
/// GET    /{id}/export/{type}                  -> export_story
///
/// GET    /{id}/chapters/next-number           -> next_number
/// POST   /{id}/chapters                       -> create_chapter
/// GET    /{id}/chapters/{number}              -> get_chapter
/// PUT    /{id}/chapters/{number}              -> update_chapter
/// DELETE /{id}/chapters/by-id/{chapter_id}    -> delete_chapter
/// GET    /{id}/chapters/{number}/notes        -> list_notes
/// POST   /{id}/chapters/{number}/notes        -> create_note
/// DELETE /{id}/chapters/{number}/notes/{nid}  -> delete_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stories::list_stories).post(stories::create_story))
        .route(
            "/{id}",
            get(stories::get_story)
                .put(stories::update_story)
                .delete(stories::delete_story),
        )
        .route("/{id}/edit-form", get(stories::get_edit_form))
        .route("/{id}/nut", post(stories::bump_nut))
        .route("/{id}/read", post(stories::bump_read))
        .route("/{id}/export/{export_type}", get(stories::export_story))
        .route("/{id}/chapters", post(chapters::create_chapter))
        .route("/{id}/chapters/next-number", get(chapters::next_number))
        .route(
            "/{id}/chapters/by-id/{chapter_id}",
            delete(chapters::delete_chapter),
        )
        .route(
            "/{id}/chapters/{number}",
            get(chapters::get_chapter).put(chapters::update_chapter),
        )
        .route(
            "/{id}/chapters/{number}/notes",
            get(chapters::list_notes).post(chapters::create_note),
        )
        .route(
            "/{id}/chapters/{number}/notes/{note_id}",
            delete(chapters::delete_note),
        )
}
