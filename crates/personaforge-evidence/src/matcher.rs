//! Quote matcher: lexical evidence extraction for trait claims
//!
//! Given a trait's claimed value and the scoped text of one speaker, finds
//! literal substrings that lexically support the claim. Two-tier and fully
//! deterministic:
//!
//! 1. Primary pass: keyword-sentence matching. Sentences containing at least
//!    one claim keyword (word-boundary, case-insensitive) are candidates.
//! 2. Fallback pass: lexical overlap. If the primary pass finds nothing,
//!    sentences sharing at least two long tokens with the claim qualify.
//!
//! A scope-aware refinement prefers first-person sentences over third-party
//! ones when the scope belongs to a participant, and every candidate passes
//! the hygiene filter before acceptance. Returned offsets always refer to the
//! clean scoped text; highlighting never shifts bookkeeping.

use crate::highlight::highlight_keywords;
use crate::hygiene::is_bad_evidence_line;
use crate::keywords::{count_keyword_hits, extract_keywords, long_tokens};
use personaforge_core::ScopeMeta;

/// Default quota of quotes per trait.
pub const DEFAULT_MAX_QUOTES: usize = 3;

/// Raw units shorter than this are discarded as noise.
const MIN_RAW_UNIT_LEN: usize = 20;
/// Candidate sentences shorter than this are discarded.
const MIN_CANDIDATE_LEN: usize = 30;
/// Minimum token length in the fallback overlap pass.
const FALLBACK_TOKEN_LEN: usize = 4;
/// Minimum shared tokens for a fallback candidate.
const FALLBACK_SHARED_TOKENS: usize = 2;
/// Quota of the fallback pass.
const FALLBACK_MAX_QUOTES: usize = 2;

/// A matched quote with its global offsets in the scoped text.
///
/// `quote` carries `**keyword**` highlighting; `global_start`/`global_end`
/// are byte offsets of the clean (unannotated) sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteMatch {
    pub quote: String,
    pub global_start: usize,
    pub global_end: usize,
}

/// Find up to `max_quotes` evidence quotes for a trait claim.
///
/// Total function: empty claim or scoped text yields an empty result, never
/// an error.
pub fn find_evidence_quotes(
    trait_value: &str,
    scoped_text: &str,
    scope_meta: &ScopeMeta,
    max_quotes: usize,
) -> Vec<QuoteMatch> {
    if trait_value.trim().is_empty() || scoped_text.trim().is_empty() || max_quotes == 0 {
        return Vec::new();
    }

    let keywords = extract_keywords(trait_value);
    let units = sentence_units(scoped_text);
    let prefer_first_person = !scope_meta.speaker_role.is_disallowed_for_evidence();

    // Primary pass: keyword-sentence matching.
    let mut candidates: Vec<(usize, usize)> = Vec::new();
    if !keywords.is_empty() {
        for &(start, end) in &units {
            let sentence = &scoped_text[start..end];
            if sentence.len() < MIN_CANDIDATE_LEN || is_bad_evidence_line(sentence) {
                continue;
            }
            if count_keyword_hits(sentence, &keywords) >= 1 {
                candidates.push((start, end));
            }
        }
    }

    // Fallback pass: lexical overlap with the claim itself.
    let quota = if candidates.is_empty() {
        let claim_tokens = long_tokens(trait_value, FALLBACK_TOKEN_LEN);
        if claim_tokens.len() >= FALLBACK_SHARED_TOKENS {
            for &(start, end) in &units {
                let sentence = &scoped_text[start..end];
                if sentence.len() < MIN_CANDIDATE_LEN || is_bad_evidence_line(sentence) {
                    continue;
                }
                let shared = long_tokens(sentence, FALLBACK_TOKEN_LEN)
                    .intersection(&claim_tokens)
                    .count();
                if shared >= FALLBACK_SHARED_TOKENS {
                    candidates.push((start, end));
                }
            }
        }
        FALLBACK_MAX_QUOTES.min(max_quotes)
    } else {
        max_quotes
    };

    if prefer_first_person {
        candidates = select_first_person(scoped_text, candidates);
    }

    candidates
        .into_iter()
        .take(quota)
        .map(|(start, end)| QuoteMatch {
            quote: highlight_keywords(&scoped_text[start..end], &keywords),
            global_start: start,
            global_end: end,
        })
        .collect()
}

/// Split the scoped text into trimmed sentence-like units.
///
/// Simple terminator splitting (`.`, `!`, `?`, full-width `？`) plus line
/// breaks so a unit never spans dialogue blocks. Units shorter than
/// [`MIN_RAW_UNIT_LEN`] after trimming are dropped as noise. Returns
/// `[start, end)` byte offsets into the input.
fn sentence_units(text: &str) -> Vec<(usize, usize)> {
    let mut units = Vec::new();
    let mut unit_start = 0;

    let mut push_unit = |start: usize, end: usize, units: &mut Vec<(usize, usize)>| {
        let raw = &text[start..end];
        let trimmed = raw.trim();
        if trimmed.len() < MIN_RAW_UNIT_LEN {
            return;
        }
        let lead = raw.len() - raw.trim_start().len();
        let trail = raw.len() - raw.trim_end().len();
        units.push((start + lead, end - trail));
    };

    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\u{FF1F}' | '\n') {
            push_unit(unit_start, idx + ch.len_utf8(), &mut units);
            unit_start = idx + ch.len_utf8();
        }
    }
    if unit_start < text.len() {
        push_unit(unit_start, text.len(), &mut units);
    }

    units
}

/// Markers indicating a sentence talks about someone other than the speaker.
const THIRD_PARTY_MARKERS: [&str; 6] =
    [" client", " policyholder", " customer", " they ", " their ", " them "];

/// Prefer first-person candidate sentences over third-party ones; fall back
/// to the full candidate list when no first-person candidate exists.
fn select_first_person(
    scoped_text: &str,
    candidates: Vec<(usize, usize)>,
) -> Vec<(usize, usize)> {
    let first_person: Vec<(usize, usize)> = candidates
        .iter()
        .copied()
        .filter(|&(start, end)| {
            let padded = format!(" {} ", scoped_text[start..end].to_lowercase());
            let speaks_for_self = padded.contains(" i ") || padded.contains(" we ");
            let about_others = THIRD_PARTY_MARKERS.iter().any(|m| padded.contains(m));
            speaks_for_self && !about_others
        })
        .collect();

    if first_person.is_empty() {
        candidates
    } else {
        first_person
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personaforge_core::{ScopeMeta, SpeakerRole};

    fn participant_scope() -> ScopeMeta {
        ScopeMeta::for_speaker("Maria", SpeakerRole::Participant)
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let scope = participant_scope();
        assert!(find_evidence_quotes("", "some text", &scope, 3).is_empty());
        assert!(find_evidence_quotes("claim", "", &scope, 3).is_empty());
        assert!(find_evidence_quotes("claim", "text", &scope, 0).is_empty());
    }

    #[test]
    fn test_primary_pass_finds_keyword_sentence() {
        let text = "I need a website for my bakery and I want it launched quickly. The weather was nice today though.";
        let matches = find_evidence_quotes("needs website quickly", text, &participant_scope(), 3);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].quote.contains("**website**"));
        // Offsets refer to the clean text, not the highlighted quote.
        let clean = &text[matches[0].global_start..matches[0].global_end];
        assert_eq!(clean, "I need a website for my bakery and I want it launched quickly.");
    }

    #[test]
    fn test_question_sentences_rejected() {
        let text = "Would a website help your bakery grow faster? I need a website for my bakery right now.";
        let matches = find_evidence_quotes("website bakery", text, &participant_scope(), 3);
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].quote.contains('?'));
    }

    #[test]
    fn test_short_sentences_discarded() {
        let text = "Website is key. I rebuilt our whole website platform during the spring migration.";
        let matches = find_evidence_quotes("website platform", text, &participant_scope(), 3);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].global_start > 0);
    }

    #[test]
    fn test_fallback_lexical_overlap() {
        // Salient keywords ("possible") are absent, so the primary pass finds
        // nothing; the sentence still shares two long tokens with the claim.
        let text = "We need the rollout finished when the quarter closes out.";
        let matches =
            find_evidence_quotes("need this when possible", text, &participant_scope(), 3);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].quote.contains("rollout"));
    }

    #[test]
    fn test_fallback_quota_is_two() {
        let text = "\
We need the rollout finished when the quarter closes out.\n\
We need approvals when the budget group meets on Fridays.\n\
We need backups ready when the main system goes down badly.";
        let matches =
            find_evidence_quotes("need this when possible", text, &participant_scope(), 5);
        // All three overlap, but the fallback pass caps at two quotes.
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_first_person_preferred_over_third_party() {
        let text = "I have 15 years of experience as a broker in this market. \
They are usually policyholders with experience of their own market.";
        let matches = find_evidence_quotes("broker experience market", text, &participant_scope(), 3);
        assert!(!matches.is_empty());
        for m in &matches {
            assert!(m.quote.starts_with("I have"));
        }
    }

    #[test]
    fn test_third_party_used_when_no_first_person() {
        let text = "Policyholders in this market generally have long broker experience records.";
        let matches = find_evidence_quotes("broker experience market", text, &participant_scope(), 3);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_quota_respected() {
        let text = "\
I use the website daily for all my invoicing and admin work.\n\
I rely on the website search for most of my daily tasks.\n\
I doubled incoming leads after the website redesign last spring.\n\
I pay almost nothing to keep the website running each month.";
        let matches = find_evidence_quotes("website usage", text, &participant_scope(), 2);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_matches_scan_in_original_order() {
        let text = "\
I adopted the budget tool in January for the whole team.\n\
I review the budget every Friday with the finance group.";
        let matches = find_evidence_quotes("budget tooling", text, &participant_scope(), 2);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].global_start < matches[1].global_start);
    }

    #[test]
    fn test_sentence_units_offsets() {
        let text = "First sentence long enough here. Second one also long enough!";
        let units = sentence_units(text);
        assert_eq!(units.len(), 2);
        assert_eq!(&text[units[0].0..units[0].1], "First sentence long enough here.");
        assert_eq!(&text[units[1].0..units[1].1], "Second one also long enough!");
    }
}
