//! Keyword highlighting in matched quotes
//!
//! Matched keywords are wrapped in a bold-marker convention (`**term**`).
//! Substitution is word-boundary-safe and case-insensitive, and keywords are
//! substituted longest-first so a short keyword never corrupts a longer one
//! already highlighted ("age" inside "manage").
//!
//! Highlighting is presentation only: offset bookkeeping is always computed
//! against the clean text, never the annotated text.

use regex::Regex;

/// Bold marker placed around matched keywords.
pub const HIGHLIGHT_MARKER: &str = "**";

/// Wrap each occurrence of each keyword in `quote` with bold markers.
///
/// Fail-open: a keyword that does not compile into a valid pattern is
/// skipped, degrading to fewer highlights.
pub fn highlight_keywords(quote: &str, keywords: &[String]) -> String {
    let mut sorted: Vec<&String> = keywords.iter().filter(|k| !k.is_empty()).collect();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let mut result = quote.to_string();
    for keyword in sorted {
        let pattern = format!(r"(?i)\b({})\b", regex::escape(keyword));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        result = re
            .replace_all(&result, format!("{}$1{}", HIGHLIGHT_MARKER, HIGHLIGHT_MARKER))
            .into_owned();
    }
    result
}

/// Strip bold markers, recovering the clean quote text.
pub fn strip_highlighting(quote: &str) -> String {
    quote.replace(HIGHLIGHT_MARKER, "")
}

/// Extract all highlighted terms from a quote, in order of appearance.
pub fn highlighted_terms(quote: &str) -> Vec<String> {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("highlight regex is valid"));
    re.captures_iter(quote)
        .map(|cap| cap[1].to_string())
        .collect()
}
