//! Interview transcript parsing
//!
//! Turns raw speaker-labeled text into ordered [`TranscriptSegment`]s:
//! - "Speaker: text" and "Speaker (10:30): text" lines
//! - ALL-CAPS transcript labels ("INTERVIEWER:")
//! - "[20:04] Speaker: text" bracketed timestamps
//!
//! Roles are inferred from the speaker label so downstream hygiene can reject
//! interviewer/researcher/moderator turns.

use crate::{SpeakerRole, TranscriptSegment};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Segments of a single speaker, in original transcript order.
#[derive(Debug, Clone)]
pub struct SpeakerSegments {
    pub speaker: String,
    pub role: SpeakerRole,
    pub segments: Vec<TranscriptSegment>,
}

fn turn_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Speaker: text" or "Speaker (10:30): text", optionally preceded by "[20:04] "
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:\[[^\]]{1,12}\]\s*)?([A-Za-z][A-Za-z0-9_\-\s\.]{0,40}?)(?:\s*\(([^\)]{1,20})\))?\s*:\s*(\S.*)$")
            .expect("turn regex is valid")
    })
}

/// Parse a speaker-labeled interview transcript into ordered segments.
///
/// Lines that do not start a new turn are appended to the current turn.
/// Unattributable leading text is skipped. This function is total: any input
/// yields a (possibly empty) segment list.
pub fn parse_interview_transcript(text: &str, document_id: &str) -> Vec<TranscriptSegment> {
    let re = turn_regex();
    let mut segments: Vec<TranscriptSegment> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = re.captures(line) {
            let speaker = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            let timestamp = caps.get(2).map(|m| m.as_str().to_string());
            let dialogue = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            if speaker.is_empty() || dialogue.is_empty() {
                continue;
            }

            segments.push(TranscriptSegment {
                role: SpeakerRole::infer_from_label(&speaker),
                speaker,
                dialogue,
                document_id: document_id.to_string(),
                timestamp,
            });
        } else if let Some(current) = segments.last_mut() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                current.dialogue.push(' ');
                current.dialogue.push_str(trimmed);
            }
        }
    }

    segments
}

/// Group segments by speaker, preserving first-seen speaker order.
///
/// Segments with empty dialogue are dropped; each group keeps the role of its
/// first segment (transcripts occasionally flip a label mid-stream, and the
/// first attribution wins).
pub fn group_by_speaker(segments: &[TranscriptSegment]) -> Vec<SpeakerSegments> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, SpeakerSegments> = HashMap::new();

    for segment in segments {
        if segment.speaker.trim().is_empty() || segment.dialogue.trim().is_empty() {
            continue;
        }
        let key = segment.speaker.trim().to_lowercase();
        let entry = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            SpeakerSegments {
                speaker: segment.speaker.trim().to_string(),
                role: segment.role,
                segments: Vec::new(),
            }
        });
        entry.segments.push(segment.clone());
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}

/// Lexical stakeholder-category heuristic from a speaker's own dialogue.
///
/// Configuration data, not algorithm: a coarse label used for attribution
/// metadata and influence scoring.
pub fn infer_stakeholder_category(dialogue: &str) -> Option<String> {
    let lower = dialogue.to_lowercase();
    let categories: [(&str, &[&str]); 4] = [
        ("decision_maker", &["budget", "approve", "sign off", "my team", "i decide", "head of"]),
        ("technical", &["api", "integration", "deploy", "codebase", "infrastructure", "engineer"]),
        ("end_user", &["i use", "every day", "daily", "workflow", "my tasks"]),
        ("influencer", &["recommend", "advise", "consult", "evaluate", "shortlist"]),
    ];

    let mut best: Option<(&str, usize)> = None;
    for (category, markers) in categories {
        let hits = markers.iter().filter(|m| lower.contains(*m)).count();
        if hits > 0 && best.map(|(_, b)| hits > b).unwrap_or(true) {
            best = Some((category, hits));
        }
    }
    best.map(|(category, _)| category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labeled_transcript() {
        let text = r#"
Interviewer (10:30): What do you spend on tooling?
Maria (10:31): About 10k EUR a year.
Maria (10:32): Mostly on design software.
"#;
        let segments = parse_interview_transcript(text, "doc1");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].role, SpeakerRole::Interviewer);
        assert_eq!(segments[1].speaker, "Maria");
        assert_eq!(segments[1].role, SpeakerRole::Participant);
        assert_eq!(segments[1].document_id, "doc1");
        assert_eq!(segments[0].timestamp.as_deref(), Some("10:30"));
    }

    #[test]
    fn test_parse_bracketed_timestamp() {
        let text = "[20:04] INTERVIEWER: tell me more\n[20:05] Maria: I run a cafe in Lisbon.";
        let segments = parse_interview_transcript(text, "doc1");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].role, SpeakerRole::Interviewer);
        assert_eq!(segments[1].dialogue, "I run a cafe in Lisbon.");
    }

    #[test]
    fn test_continuation_lines_merge() {
        let text = "Maria: I need a website\nand I need it fast.";
        let segments = parse_interview_transcript(text, "doc1");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].dialogue, "I need a website and I need it fast.");
    }

    #[test]
    fn test_group_by_speaker_preserves_order() {
        let text = "Anna: first\nBert: second\nAnna: third";
        let segments = parse_interview_transcript(text, "doc1");
        let groups = group_by_speaker(&segments);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].speaker, "Anna");
        assert_eq!(groups[0].segments.len(), 2);
        assert_eq!(groups[1].speaker, "Bert");
    }

    #[test]
    fn test_stakeholder_category() {
        let category = infer_stakeholder_category("I approve the budget for my team");
        assert_eq!(category.as_deref(), Some("decision_maker"));
        assert_eq!(infer_stakeholder_category("hello"), None);
    }
}
