//! Field rules for stories, chapters, inline notes and actors.
//!
//! Handlers call these before touching the database so that every rejection
//! surfaces as a [`CoreError::Validation`].

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum story title length accepted from clients, in characters.
pub const MAX_STORY_TITLE_LEN: usize = 50;

/// Stories shown per index page.
pub const STORY_PAGE_SIZE: i64 = 10;

/// Actors shown per index page.
pub const ACTOR_PAGE_SIZE: i64 = 20;

/// Lowest valid chapter number.
pub const MIN_CHAPTER_NUMBER: i64 = 1;

/// Highest valid chapter number.
pub const MAX_CHAPTER_NUMBER: i64 = 10_000;

/// Maximum chapter title length, in characters.
pub const MAX_CHAPTER_TITLE_LEN: usize = 50;

/// Inline notes shorter than this (after trimming) are rejected.
pub const MIN_NOTE_LEN: usize = 2;

/// Inline notes are truncated to this many characters.
pub const MAX_NOTE_LEN: usize = 800;

/// Maximum actor name length, in characters.
pub const MAX_ACTOR_NAME_LEN: usize = 200;

/// Maximum actor description length, in characters.
pub const MAX_ACTOR_DESCRIPTION_LEN: usize = 2000;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Map blank optional text to `None`, leaving other values untouched.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trim optional text and map blank values to `None`.
pub fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

/// Validate and trim a story title.
pub fn validate_story_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    check_max_len("Title", title, MAX_STORY_TITLE_LEN)?;
    Ok(title.to_string())
}

/// Apply a `+1` / `-1` delta to a counter, never going below zero.
///
/// ```
/// use myficdb_core::story::apply_counter_delta;
/// assert_eq!(apply_counter_delta(3, 1).unwrap(), 4);
/// assert_eq!(apply_counter_delta(0, -1).unwrap(), 0);
/// assert!(apply_counter_delta(3, 2).is_err());
/// ```
pub fn apply_counter_delta(current: i64, delta: i64) -> Result<i64, CoreError> {
    if delta != 1 && delta != -1 {
        return Err(CoreError::Validation(
            "delta must be either 1 or -1".to_string(),
        ));
    }
    Ok((current + delta).max(0))
}

/// Page bounds for a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Effective (clamped) page number, starting at 1.
    pub page: i64,
    pub total_pages: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Clamp a requested page into `1..=total_pages` and compute its offset.
///
/// ```
/// use myficdb_core::story::page_window;
/// let w = page_window(Some(9), 25, 10);
/// assert_eq!((w.page, w.total_pages, w.offset), (3, 3, 20));
/// ```
pub fn page_window(requested: Option<i64>, total_items: i64, page_size: i64) -> PageWindow {
    let total_pages = (total_items.max(0) + page_size - 1) / page_size;
    let page = requested.unwrap_or(1).clamp(1, total_pages.max(1));
    PageWindow {
        page,
        total_pages,
        offset: (page - 1) * page_size,
        limit: page_size,
    }
}

// ---------------------------------------------------------------------------
// Chapters and inline notes
// ---------------------------------------------------------------------------

/// Validate a chapter number is within `1..=10000`.
pub fn validate_chapter_number(number: i64) -> Result<(), CoreError> {
    if !(MIN_CHAPTER_NUMBER..=MAX_CHAPTER_NUMBER).contains(&number) {
        return Err(CoreError::Validation(format!(
            "Chapter number must be between {MIN_CHAPTER_NUMBER} and {MAX_CHAPTER_NUMBER}"
        )));
    }
    Ok(())
}

/// Trim a chapter title, mapping blank to `None`.
pub fn clean_chapter_title(title: Option<&str>) -> Result<Option<String>, CoreError> {
    let title = trimmed_or_none(title);
    if let Some(t) = &title {
        check_max_len("Chapter title", t, MAX_CHAPTER_TITLE_LEN)?;
    }
    Ok(title)
}

/// Trim a chapter body and require it to be non-empty.
pub fn require_chapter_body(body: &str) -> Result<&str, CoreError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(CoreError::Validation("Chapter body is required".to_string()));
    }
    Ok(body)
}

/// Trim note text, rejecting short notes and truncating long ones.
pub fn prepare_note_details(raw: &str) -> Result<String, CoreError> {
    let details = raw.trim();
    if details.chars().count() < MIN_NOTE_LEN {
        return Err(CoreError::Validation(
            "Note details is too short".to_string(),
        ));
    }
    Ok(details.chars().take(MAX_NOTE_LEN).collect())
}

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// Validate free-form actor fields, returning the trimmed description.
pub fn validate_actor_fields(
    cleaned_name: &str,
    description: Option<&str>,
    age: Option<i64>,
) -> Result<Option<String>, CoreError> {
    if cleaned_name.is_empty() {
        return Err(CoreError::Validation("Actor name is required".to_string()));
    }
    check_max_len("Actor name", cleaned_name, MAX_ACTOR_NAME_LEN)?;

    let description = trimmed_or_none(description);
    if let Some(d) = &description {
        check_max_len("Description", d, MAX_ACTOR_DESCRIPTION_LEN)?;
    }

    if let Some(age) = age {
        if age < 0 {
            return Err(CoreError::Validation("Age must not be negative".to_string()));
        }
    }

    Ok(description)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(validate_story_title("  Hello ").unwrap(), "Hello");
        assert_matches!(validate_story_title("   "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_story_title(&"x".repeat(51)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn counters_clamp_at_zero() {
        assert_eq!(apply_counter_delta(1, -1).unwrap(), 0);
        assert_eq!(apply_counter_delta(0, -1).unwrap(), 0);
        assert_matches!(apply_counter_delta(0, 0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn page_window_clamps() {
        assert_eq!(page_window(Some(0), 5, 10).page, 1);
        assert_eq!(page_window(None, 0, 10).total_pages, 0);
        assert_eq!(page_window(Some(4), 0, 10).page, 1);
        let w = page_window(Some(2), 20, 10);
        assert_eq!((w.page, w.total_pages, w.offset, w.limit), (2, 2, 10, 10));
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let empty = page_window(Some(i64::MAX), 0, 10);
        assert_eq!((empty.page, empty.offset), (1, 0));

        let full = page_window(Some(i64::MAX), 35, 10);
        assert_eq!((full.page, full.total_pages, full.offset), (4, 4, 30));

        let negative = page_window(Some(i64::MIN), 35, 20);
        assert_eq!((negative.page, negative.offset), (1, 0));
    }

    #[test]
    fn chapter_number_bounds() {
        assert!(validate_chapter_number(1).is_ok());
        assert!(validate_chapter_number(10_000).is_ok());
        assert!(validate_chapter_number(0).is_err());
        assert!(validate_chapter_number(10_001).is_err());
    }

    #[test]
    fn chapter_title_blank_becomes_none() {
        assert_eq!(clean_chapter_title(Some("  ")).unwrap(), None);
        assert_eq!(clean_chapter_title(Some(" One ")).unwrap().as_deref(), Some("One"));
        assert!(clean_chapter_title(Some(&"t".repeat(51))).is_err());
    }

    #[test]
    fn notes_are_trimmed_and_truncated() {
        assert_matches!(prepare_note_details(" a "), Err(CoreError::Validation(_)));
        assert_eq!(prepare_note_details("  ok  ").unwrap(), "ok");
        assert_eq!(prepare_note_details(&"n".repeat(900)).unwrap().len(), MAX_NOTE_LEN);
    }

    #[test]
    fn actor_fields() {
        assert_eq!(
            validate_actor_fields("Amy", Some("  tall  "), Some(30)).unwrap().as_deref(),
            Some("tall")
        );
        assert_eq!(validate_actor_fields("Amy", Some(" "), None).unwrap(), None);
        assert!(validate_actor_fields("", None, None).is_err());
        assert!(validate_actor_fields("Amy", None, Some(-1)).is_err());
    }
}
