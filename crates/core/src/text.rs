//! Plain-text helpers over stored chapter HTML and byte counts.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Average reading speed used for time-to-read estimates.
pub const WORDS_PER_MINUTE: f64 = 300.0;

/// Number of words kept from a summary on story cards.
pub const SUMMARY_PREVIEW_WORDS: usize = 40;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const SIZE_UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Count the words of an HTML fragment. Tags act as word separators.
///
/// ```
/// use myficdb_core::text::count_words;
/// assert_eq!(count_words("<p>One two</p><p>three</p>"), 3);
/// assert_eq!(count_words(""), 0);
/// ```
pub fn count_words(html: &str) -> i64 {
    let plain = TAG_RE.replace_all(html, " ");
    plain.split_whitespace().count() as i64
}

/// Estimated reading time in minutes for a word count.
pub fn time_to_read_minutes(word_count: i64) -> f64 {
    if word_count <= 0 {
        0.0
    } else {
        word_count as f64 / WORDS_PER_MINUTE
    }
}

/// Reduce HTML to plain text and keep at most `max_words` words, appending an
/// ellipsis when anything was cut.
pub fn truncate_words(html: &str, max_words: usize) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let stripped = TAG_RE.replace_all(html, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    let plain = WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string();

    let words: Vec<&str> = plain.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() <= max_words {
        return plain;
    }

    format!("{}…", words[..max_words].join(" "))
}

/// Human-readable size with binary units, e.g. `512 B`, `1.50 KB`.
///
/// ```
/// use myficdb_core::text::format_file_size;
/// assert_eq!(format_file_size(1023), "1023 B");
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < SIZE_UNITS.len() {
        value /= 1024.0;
        exp += 1;
    }

    format!("{value:.2} {}B", SIZE_UNITS[exp - 1])
}

/// Format a process uptime as `D Days, H Hours, M Minutes, S Seconds`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{days} Days, {hours} Hours, {minutes} Minutes, {seconds} Seconds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_separate_words() {
        assert_eq!(count_words("one<br>two<br/>three"), 3);
        assert_eq!(count_words("<p>  </p>"), 0);
    }

    #[test]
    fn reading_time_uses_three_hundred_wpm() {
        assert_eq!(time_to_read_minutes(0), 0.0);
        assert_eq!(time_to_read_minutes(600), 2.0);
        assert_eq!(time_to_read_minutes(150), 0.5);
    }

    #[test]
    fn truncate_strips_markup_and_decodes_entities() {
        let html = "<p>Tom &amp; Jerry&#39;s   <em>big</em>\n day</p>";
        assert_eq!(truncate_words(html, 10), "Tom & Jerry's big day");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_words("a b c d", 2), "a b…");
        assert_eq!(truncate_words("   ", 2), "");
    }

    #[test]
    fn file_size_boundaries() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn uptime_breakdown() {
        let uptime = Duration::from_secs(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(
            format_uptime(uptime),
            "2 Days, 3 Hours, 4 Minutes, 5 Seconds"
        );
    }
}
