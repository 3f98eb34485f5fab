//! Display-name cleanup, normalization keys and slug generation.
//!
//! Tags, series and actors share one pipeline:
//!
//! 1. [`clean_display_name`] trims and collapses internal whitespace.
//! 2. [`normalize_upper`] derives the upper-case uniqueness key.
//! 3. [`slug_base`] turns the key into a URL-safe slug, falling back to a
//!    fixed token per entity kind when nothing survives.
//! 4. [`slug_candidates`] yields `base`, `base-2`, `base-3`, ... for the
//!    repository to probe until an unused slug is found.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of names accepted from a single list.
pub const MAX_NAMES_PER_LIST: usize = 30;

/// First numeric suffix that is never tried when resolving slug collisions.
pub const MAX_SLUG_SUFFIX: u32 = 1000;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-]").expect("valid regex"));

static MULTI_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The three named entities that can be linked to a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    Tag,
    Series,
    Actor,
}

impl NamedKind {
    /// Slug used when a name slugifies to nothing (e.g. only punctuation).
    pub fn slug_fallback(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Series => "series",
            Self::Actor => "actor",
        }
    }

    /// Entity label used in error messages and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::Series => "Series",
            Self::Actor => "Actor",
        }
    }

    /// The stored display name for a cleaned input name.
    ///
    /// Tags are stored lower-case; series and actors keep their casing.
    pub fn stored_name(&self, cleaned: &str) -> String {
        match self {
            Self::Tag => cleaned.to_lowercase(),
            Self::Series | Self::Actor => cleaned.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Trim and collapse every whitespace run to a single space.
///
/// ```
/// use myficdb_core::naming::clean_display_name;
/// assert_eq!(clean_display_name("  Dark \t  Comedy "), "Dark Comedy");
/// ```
pub fn clean_display_name(input: &str) -> String {
    WHITESPACE_RE.replace_all(input.trim(), " ").into_owned()
}

/// Upper-cased comparison key for a (cleaned) name.
pub fn normalize_upper(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Convert a display name into a URL-safe slug.
///
/// ```
/// use myficdb_core::naming::slugify;
/// assert_eq!(slugify("Dark Comedy"), "dark-comedy");
/// assert_eq!(slugify("  --Sci-Fi!! & Fantasy-- "), "sci-fi-fantasy");
/// ```
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&lowered, "-");
    let stripped = NON_SLUG_RE.replace_all(&dashed, "");
    let collapsed = MULTI_DASH_RE.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug base for a normalized name, substituting the kind's fallback token
/// when the slug would be empty.
pub fn slug_base(normalized: &str, kind: NamedKind) -> String {
    let slug = slugify(normalized);
    if slug.is_empty() {
        kind.slug_fallback().to_string()
    } else {
        slug
    }
}

/// Slugs to probe in order: `base`, then `base-2` up to `base-999`.
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((2..MAX_SLUG_SUFFIX).map(move |i| format!("{base}-{i}")))
}

/// Clean every name, drop blanks, de-duplicate case-insensitively (first
/// occurrence wins) and keep at most `max` entries.
pub fn clean_dedupe_and_limit<I, S>(raw_names: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw_names
        .into_iter()
        .map(|n| clean_display_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.to_lowercase()))
        .take(max)
        .collect()
}

/// Split a comma-separated list and run it through [`clean_dedupe_and_limit`].
///
/// ```
/// use myficdb_core::naming::parse_csv_and_clean;
/// assert_eq!(
///     parse_csv_and_clean(Some(" Angst, fluff ,,ANGST "), 30),
///     vec!["Angst".to_string(), "fluff".to_string()],
/// );
/// assert!(parse_csv_and_clean(None, 30).is_empty());
/// ```
pub fn parse_csv_and_clean(csv: Option<&str>, max: usize) -> Vec<String> {
    match csv {
        Some(csv) if !csv.trim().is_empty() => clean_dedupe_and_limit(
            csv.split(',').map(str::trim).filter(|s| !s.is_empty()),
            max,
        ),
        _ => Vec::new(),
    }
}
