//! Search and autocomplete helpers.
//!
//! This module lives in `core` (zero internal deps) so the repository layer
//! only has to bind the values these helpers produce.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Default number of autocomplete suggestions.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 10;

/// Maximum number of autocomplete suggestions.
pub const MAX_SUGGEST_LIMIT: i64 = 20;

/// Suggestion queries shorter than this return nothing.
pub const MIN_SUGGEST_QUERY_LEN: usize = 2;

/// Number of stories returned by global search.
pub const GLOBAL_SEARCH_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Upper-cased suggestion needle, or `None` when the query is too short.
///
/// ```
/// use myficdb_core::search::suggestion_needle;
/// assert_eq!(suggestion_needle(" an "), Some("AN".to_string()));
/// assert_eq!(suggestion_needle("a"), None);
/// ```
pub fn suggestion_needle(query: &str) -> Option<String> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGEST_QUERY_LEN {
        return None;
    }
    Some(query.to_uppercase())
}

/// Build the `LIKE` pattern for global search: lower-cased, trimmed, with
/// every space widened to a wildcard.
///
/// ```
/// use myficdb_core::search::fuzzy_like_pattern;
/// assert_eq!(fuzzy_like_pattern("Doctor Who"), Some("%doctor%who%".to_string()));
/// assert_eq!(fuzzy_like_pattern("   "), None);
/// ```
pub fn fuzzy_like_pattern(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(format!("%{}%", query.to_lowercase().replace(' ', "%")))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needle_requires_two_chars_after_trim() {
        assert_eq!(suggestion_needle("   x   "), None);
        assert_eq!(suggestion_needle("ab"), Some("AB".to_string()));
    }

    #[test]
    fn pattern_widens_every_space() {
        assert_eq!(fuzzy_like_pattern(" a  b "), Some("%a%%b%".to_string()));
    }

    #[test]
    fn clamp_limit_bounds() {
        assert_eq!(clamp_limit(None, DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT), 10);
        assert_eq!(clamp_limit(Some(0), DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT), 1);
        assert_eq!(clamp_limit(Some(99), DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT), 20);
    }
}
