//! Story export rendering (HTML, Markdown and the all-stories zip).
//!
//! Rendering works on a [`StoryAggregate`] that the repository layer has
//! already loaded; nothing here touches the database.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::LazyLock;

use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// `Content-Type` of the all-stories archive.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

const STYLE_SHEET: &str = "\
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif;max-width:900px;margin:40px auto;padding:0 16px;line-height:1.6}
header{border-bottom:1px solid #ddd;padding-bottom:16px;margin-bottom:24px}
.meta{color:#444;font-size:0.95rem}
.meta strong{color:#000}
h1{line-height:1.2}
section.chapter{margin-top:32px;padding-top:16px;border-top:1px solid #eee}";

static EXCESS_NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// A chapter as it appears in an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterAggregate {
    pub number: i64,
    pub title: Option<String>,
    pub body: String,
}

/// Everything the renderers need to know about one story.
#[derive(Debug, Clone)]
pub struct StoryAggregate {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
    pub summary: Option<String>,
    pub actors: Vec<String>,
    pub tags: Vec<String>,
    pub chapters: Vec<ChapterAggregate>,
}

impl StoryAggregate {
    /// Build an aggregate, normalizing name lists (non-blank, case-insensitive
    /// distinct, sorted) and ordering chapters by number.
    pub fn new(
        id: DbId,
        title: String,
        created_at: Timestamp,
        summary: Option<String>,
        actors: Vec<String>,
        tags: Vec<String>,
        mut chapters: Vec<ChapterAggregate>,
    ) -> Self {
        chapters.sort_by_key(|c| c.number);
        Self {
            id,
            title,
            created_at,
            summary,
            actors: distinct_sorted(actors),
            tags: distinct_sorted(tags),
            chapters,
        }
    }
}

fn distinct_sorted(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect();
    out.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    out
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Supported single-story export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Markdown,
}

impl ExportFormat {
    /// Parse a format name (`html`, `markdown` or `md`, any case).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Some(Self::Html),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }
}

/// A rendered export ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Render one story in the requested format.
pub fn render_story(story: &StoryAggregate, format: ExportFormat) -> Result<ExportPayload, CoreError> {
    let body = match format {
        ExportFormat::Html => render_html(story),
        ExportFormat::Markdown => render_markdown(story)?,
    };

    Ok(ExportPayload {
        bytes: body.into_bytes(),
        content_type: format.content_type(),
        file_name: export_file_name(story, format.extension()),
    })
}

/// Download name for a story export: `{title}-{id}.{ext}`.
///
/// Path separators in the title are replaced so the name is safe to use as a
/// zip entry.
pub fn export_file_name(story: &StoryAggregate, extension: &str) -> String {
    let stem: String = story
        .title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}-{}.{extension}", story.id)
}

/// Name of the all-stories archive for the given moment.
pub fn archive_file_name(now: Timestamp) -> String {
    format!("myficdb-stories-{}.zip", now.format("%Y%m%d-%H%M%S"))
}

/// Render every story as HTML into one in-memory zip archive.
pub fn render_html_archive(stories: &[StoryAggregate]) -> Result<Vec<u8>, CoreError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for story in stories {
        let entry_name = export_file_name(story, ExportFormat::Html.extension());
        zip.start_file(entry_name, options)
            .map_err(|e| CoreError::Internal(format!("Failed to add zip entry: {e}")))?;
        zip.write_all(render_html(story).as_bytes())
            .map_err(|e| CoreError::Internal(format!("Failed to write zip entry: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| CoreError::Internal(format!("Failed to finish zip archive: {e}")))?;
    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

fn chapter_heading(chapter: &ChapterAggregate) -> String {
    match chapter.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => format!("Chapter {}: {title}", chapter.number),
        _ => format!("Chapter {}", chapter.number),
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Render a self-contained HTML document.
pub fn render_html(story: &StoryAggregate) -> String {
    let title = html_escape::encode_safe(&story.title);
    let created = story.created_at.format("%Y-%m-%d %H:%M UTC").to_string();

    let mut lines: Vec<String> = vec![
        "<!doctype html>".into(),
        "<html lang=\"en\">".into(),
        "<head>".into(),
        "<meta charset=\"utf-8\" />".into(),
        format!("<title>{title}</title>"),
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />".into(),
        "<style>".into(),
        STYLE_SHEET.into(),
        "</style>".into(),
        "</head>".into(),
        "<body>".into(),
        "<header>".into(),
        format!("<h1>{title}</h1>"),
        "<div class=\"meta\">".into(),
        format!(
            "<div><strong>Created:</strong> {}</div>",
            html_escape::encode_safe(&created)
        ),
        format!(
            "<div><strong>Actors:</strong> {}</div>",
            html_escape::encode_safe(&join_or_none(&story.actors))
        ),
        format!(
            "<div><strong>Tags:</strong> {}</div>",
            html_escape::encode_safe(&join_or_none(&story.tags))
        ),
        "</div>".into(),
        "</header>".into(),
        "<section>".into(),
        "<h2>Summary</h2>".into(),
        non_blank(story.summary.as_deref())
            .unwrap_or("<p><em>No summary.</em></p>")
            .to_string(),
        "</section>".into(),
    ];

    for chapter in &story.chapters {
        lines.push("<section class=\"chapter\">".into());
        lines.push(format!(
            "<h2>{}</h2>",
            html_escape::encode_safe(&chapter_heading(chapter))
        ));
        lines.push(
            non_blank(Some(chapter.body.as_str()))
                .unwrap_or("<p><em>No content.</em></p>")
                .to_string(),
        );
        lines.push("</section>".into());
    }

    lines.push("</body>".into());
    lines.push("</html>".into());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a Markdown document, converting stored HTML along the way.
pub fn render_markdown(story: &StoryAggregate) -> Result<String, CoreError> {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", story.title));
    out.push_str(&format!(
        "- **Created:** {} UTC\n",
        story.created_at.format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&format!("- **Actors:** {}\n", join_or_none(&story.actors)));
    out.push_str(&format!("- **Tags:** {}\n\n", join_or_none(&story.tags)));

    out.push_str("## Summary\n\n");
    match non_blank(story.summary.as_deref()) {
        Some(summary) => out.push_str(&html_to_markdown(summary)?),
        None => out.push_str("_No summary._"),
    }
    out.push_str("\n\n");

    for chapter in &story.chapters {
        out.push_str(&format!("## {}\n\n", chapter_heading(chapter)));
        match non_blank(Some(chapter.body.as_str())) {
            Some(body) => out.push_str(&html_to_markdown(body)?),
            None => out.push_str("_No content._"),
        }
        out.push_str("\n\n");
    }

    Ok(out)
}

/// Convert an HTML fragment to Markdown, collapsing runs of blank lines.
pub fn html_to_markdown(html: &str) -> Result<String, CoreError> {
    let markdown = htmd::convert(html)
        .map_err(|e| CoreError::Internal(format!("Markdown conversion failed: {e}")))?;
    Ok(EXCESS_NEWLINES_RE
        .replace_all(&markdown, "\n\n")
        .trim()
        .to_string())
}
