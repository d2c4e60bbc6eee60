//! Text analytics applied to every scraped news item.
//!
//! Two pure functions feed the report's computed columns:
//! - [`count_phrase`]: case-insensitive, non-overlapping substring count
//! - [`find_money_formats`]: currency mentions in three literal shapes
//!
//! Neither function tokenizes. "time" matches inside "sometimes".

use once_cell::sync::Lazy;
use regex::Regex;

/// `$1,200.50`, `30 dollars`, `40 USD`.
static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$[\d,]+(?:\.\d+)?|\d+ dollars|\d+ USD").expect("money pattern is valid")
});

/// Count how many times `phrase` occurs in `text`, ignoring case.
///
/// Matches are non-overlapping and scanned left to right, so `"aa"` occurs
/// twice in `"aaaa"`. An empty phrase counts as zero matches.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(count_phrase("Time", "It's time, time again"), 2);
/// assert_eq!(count_phrase("", "anything"), 0);
/// ```
pub fn count_phrase(phrase: &str, text: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&phrase.to_lowercase()).count()
}

/// Find every currency mention in `text`, in order of appearance.
///
/// Recognized shapes are a `$` followed by digits (commas allowed) with an
/// optional decimal fraction, digits followed by ` dollars`, and digits
/// followed by ` USD`. The suffix words are case-sensitive.
pub fn find_money_formats(text: &str) -> Vec<String> {
    MONEY_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
