//! Validation for comma-separated name lists submitted with a story.

use std::collections::HashSet;

use crate::error::CoreError;

/// Limits applied to one comma-separated list field.
#[derive(Debug, Clone, Copy)]
pub struct CsvListRules {
    /// Maximum number of distinct (case-insensitive) entries.
    pub max_items: usize,
    /// Maximum length of a single entry, in characters.
    pub max_token_len: usize,
    /// Maximum length of the raw submitted string, in characters.
    pub max_raw_len: usize,
}

/// Rules for the tags / series / actors fields of a story.
pub const STORY_LINK_RULES: CsvListRules = CsvListRules {
    max_items: 30,
    max_token_len: 50,
    max_raw_len: 2000,
};

/// Validate a comma-separated list. Blank or missing values always pass.
pub fn validate_csv_list(
    field: &str,
    value: Option<&str>,
    rules: CsvListRules,
) -> Result<(), CoreError> {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(());
    };

    if raw.chars().count() > rules.max_raw_len {
        return Err(CoreError::Validation(format!(
            "{field} is too long (max {} characters)",
            rules.max_raw_len
        )));
    }

    let mut seen = HashSet::new();
    let distinct: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect();

    if distinct.len() > rules.max_items {
        return Err(CoreError::Validation(format!(
            "{field} has too many items (max {})",
            rules.max_items
        )));
    }

    if let Some(token) = distinct
        .iter()
        .find(|t| t.chars().count() > rules.max_token_len)
    {
        let preview: String = token.chars().take(20).collect();
        return Err(CoreError::Validation(format!(
            "{field} has an item that is too long (max {} characters): \"{preview}...\"",
            rules.max_token_len
        )));
    }

    Ok(())
}
