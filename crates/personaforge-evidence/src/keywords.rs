//! Keyword extraction from trait claims
//!
//! Lexical, deterministic, English-only by design. Keyword extraction may be
//! LLM-assisted upstream; everything downstream of a keyword set is
//! deterministic.

use std::collections::HashSet;

/// Stopwords excluded from claim keywords.
pub fn stopwords() -> &'static HashSet<&'static str> {
    static WORDS: std::sync::OnceLock<HashSet<&'static str>> = std::sync::OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has",
            "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "must",
            "shall", "can", "need", "needs", "dare", "what", "when", "where", "which", "who",
            "whom", "whose", "why", "how", "this", "that", "these", "those", "i", "you", "he",
            "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your", "his",
            "its", "our", "their", "and", "or", "but", "if", "then", "than", "so", "as", "for",
            "with", "about", "to", "from", "in", "on", "at", "by", "of", "up", "out", "into",
            "onto", "very", "really", "just", "also", "such", "more", "most", "some", "any",
        ]
        .into_iter()
        .collect()
    })
}

/// Cap on keywords derived from one claim.
const MAX_KEYWORDS: usize = 8;

/// Derive a small set of salient keywords from a trait claim.
///
/// Lowercased, split on non-alphanumerics, stopwords and short tokens
/// removed, first-occurrence order preserved, capped at [`MAX_KEYWORDS`].
pub fn extract_keywords(claim: &str) -> Vec<String> {
    let stops = stopwords();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in claim
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2 && !stops.contains(w))
    {
        if seen.insert(token.to_string()) {
            keywords.push(token.to_string());
            if keywords.len() >= MAX_KEYWORDS {
                break;
            }
        }
    }
    keywords
}

/// Tokenize into lowercase word-tokens of at least `min_len` characters.
/// Used by the fallback lexical-overlap pass.
pub fn long_tokens(text: &str, min_len: usize) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= min_len)
        .map(String::from)
        .collect()
}

/// Count how many keywords appear in `text`, case-insensitive with word
/// boundaries (a keyword "age" does not match inside "manage").
pub fn count_keyword_hits(text: &str, keywords: &[String]) -> usize {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| contains_word(&lower, kw))
        .count()
}

/// Word-boundary containment check over a lowercased haystack.
pub fn contains_word(lower_haystack: &str, lower_needle: &str) -> bool {
    if lower_needle.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(rel) = lower_haystack[search_from..].find(lower_needle) {
        let start = search_from + rel;
        let end = start + lower_needle.len();
        let before_ok = start == 0
            || !lower_haystack[..start]
                .chars()
                .next_back()
                .map(|c| c.is_alphanumeric())
                .unwrap_or(false);
        let after_ok = end == lower_haystack.len()
            || !lower_haystack[end..]
                .chars()
                .next()
                .map(|c| c.is_alphanumeric())
                .unwrap_or(false);
        if before_ok && after_ok {
            return true;
        }
        search_from = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_drops_stopwords() {
        let keywords = extract_keywords("need website fast");
        assert_eq!(keywords, vec!["website".to_string(), "fast".to_string()]);
    }

    #[test]
    fn test_extract_keywords_dedupes_preserving_order() {
        let keywords = extract_keywords("budget pressure, budget review");
        assert_eq!(
            keywords,
            vec!["budget".to_string(), "pressure".to_string(), "review".to_string()]
        );
    }

    #[test]
    fn test_extract_keywords_empty_claim() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("the a is").is_empty());
    }

    #[test]
    fn test_word_boundary_matching() {
        assert!(contains_word("i manage my age well", "age"));
        assert!(!contains_word("i manage things", "age"));
        assert!(contains_word("website!", "website"));
    }

    #[test]
    fn test_count_keyword_hits() {
        let keywords = vec!["website".to_string(), "fast".to_string()];
        assert_eq!(count_keyword_hits("I need a Website and I need it FAST", &keywords), 2);
        assert_eq!(count_keyword_hits("nothing relevant", &keywords), 0);
    }

    #[test]
    fn test_long_tokens() {
        let tokens = long_tokens("Need a website, and fast!", 4);
        assert!(tokens.contains("need"));
        assert!(tokens.contains("website"));
        assert!(tokens.contains("fast"));
        assert!(!tokens.contains("and"));
    }
}
