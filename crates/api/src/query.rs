//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?page=` for the paged story and actor listings. Out-of-range pages are
/// clamped rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

/// `?query=&limit=` for autocomplete suggestions.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<i64>,
}

/// `?query=` for the global search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}
