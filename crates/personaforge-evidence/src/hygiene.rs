//! Evidence hygiene filter
//!
//! Interview transcripts frequently mislabel or interleave interviewer turns
//! into the participant scope. This pure predicate rejects candidate quotes
//! that are question text, interviewer/researcher/moderator lines, section
//! headers, or metadata, so they are never attributed as participant claims.
//!
//! Applied uniformly to raw candidates before matching, to structured
//! evidence items after matching, and to persona-level evidence arrays as a
//! last-chance gate.

use regex::Regex;
use std::sync::OnceLock;

fn timestamp_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Leading bracketed timestamps like "[20:04]" or "[1:02:33]".
    RE.get_or_init(|| Regex::new(r"^\s*\[[0-9:\.]{1,12}\]\s*").expect("timestamp regex is valid"))
}

fn question_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*[-\u{2013}\u{2014}]?\s*(q|question)\s*:").expect("question regex is valid")
    })
}

fn speaker_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(interviewer|researcher|moderator)\s*:").expect("label regex is valid")
    })
}

fn caps_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // All-caps transcript speaker tags: "INTERVIEWER:", "PM:".
    RE.get_or_init(|| Regex::new(r"^\s*[A-Z]{1,20}\s*:").expect("caps regex is valid"))
}

fn section_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\u{1F4A1}|key insights:)").expect("header regex is valid")
    })
}

/// True when a candidate quote must not be used as participant evidence.
///
/// Pure, stateless, case-insensitive. Checks run after stripping a leading
/// bracketed timestamp.
pub fn is_bad_evidence_line(candidate: &str) -> bool {
    let stripped = timestamp_prefix().replace(candidate, "");
    let line = stripped.trim();
    if line.is_empty() {
        return true;
    }

    if question_label().is_match(line) {
        return true;
    }
    if speaker_label().is_match(line) {
        return true;
    }
    if caps_label().is_match(line) {
        return true;
    }
    if section_header().is_match(line) {
        return true;
    }
    if line.to_lowercase().contains("key themes identified") {
        return true;
    }
    // Question text (ASCII and full-width).
    if line.ends_with('?') || line.ends_with('\u{FF1F}') {
        return true;
    }

    false
}
