//! Allowlist HTML sanitizer for chapter bodies.
//!
//! Chapter HTML comes from a rich-text editor and is rendered back verbatim,
//! so everything outside a small formatting vocabulary is removed before it
//! is stored. Inline `style` survives only as `text-align` declarations.

use std::borrow::Cow;
use std::sync::LazyLock;

use ammonia::Builder;

/// Elements kept in sanitized output.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "strong", "em", "ul", "ol", "li", "blockquote", "a", "span", "br", "hr", "strike",
    "sub", "sup", "code",
];

/// Attributes kept on any allowed element.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "title", "style"];

/// CSS properties kept inside a `style` attribute.
pub const ALLOWED_CSS_PROPERTIES: &[&str] = &["text-align"];

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .tag_attributes(Default::default())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect())
        .attribute_filter(filter_attribute);
    builder
});

/// Sanitize an HTML fragment against the chapter allowlist.
///
/// ```
/// use myficdb_core::sanitize::sanitize_html;
/// let clean = sanitize_html(r#"<p onclick="x()">Hi<script>alert(1)</script></p>"#);
/// assert_eq!(clean, "<p>Hi</p>");
/// ```
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

fn filter_attribute<'u>(_element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if attribute == "style" {
        filter_style(value).map(Cow::Owned)
    } else {
        Some(Cow::Borrowed(value))
    }
}

/// Keep only allowed CSS declarations with plain keyword values.
fn filter_style(style: &str) -> Option<String> {
    let kept: Vec<String> = style
        .split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            let allowed = ALLOWED_CSS_PROPERTIES.contains(&property.as_str())
                && !value.is_empty()
                && value.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
            allowed.then(|| format!("{property}: {value}"))
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("; "))
    }
}
