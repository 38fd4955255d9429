//! Evidence attacher
//!
//! Merges matched, filtered, offset-mapped quotes back into trait claims.
//! Attachment is idempotent (dedupe by `(quote, document_id, start_char)`),
//! respects an evidence-already-present short-circuit, and protects the
//! `key_quotes` trait from being overwritten by the generic search.

use crate::highlight::strip_highlighting;
use crate::hygiene::is_bad_evidence_line;
use crate::linker::EvidenceLinker;
use crate::matcher::DEFAULT_MAX_QUOTES;
use crate::span_index::map_to_document;
use personaforge_core::{EvidenceItem, ScopeMeta, TraitClaim, KEY_QUOTES_TRAIT};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Attach evidence to every trait claim of one speaker scope.
///
/// Mutates `attributes` in place and returns the flat evidence map (trait
/// name -> final evidence list) for instrumentation and auditing; callers
/// persist it alongside the persona, not as the source of truth.
///
/// Nothing is attached when the scope's speaker resolves to a disallowed
/// role: interviewer-side dialogue never becomes participant evidence.
pub fn attach_evidence(
    attributes: &mut BTreeMap<String, TraitClaim>,
    scoped_text: &str,
    scope_meta: &ScopeMeta,
    protect_key_quotes: bool,
    linker: &dyn EvidenceLinker,
) -> BTreeMap<String, Vec<EvidenceItem>> {
    let mut evidence_map = BTreeMap::new();
    let role_allowed = !scope_meta.speaker_role.is_disallowed_for_evidence();

    for (name, claim) in attributes.iter_mut() {
        if role_allowed && should_search(name, claim, protect_key_quotes) {
            let found = link_trait(name, &claim.value, scoped_text, scope_meta, linker);
            merge_evidence(&mut claim.evidence, found);
        }
        evidence_map.insert(name.clone(), claim.evidence.clone());
    }

    evidence_map
}

/// The evidence-already-present short-circuit, plus key-quotes protection.
fn should_search(name: &str, claim: &TraitClaim, protect_key_quotes: bool) -> bool {
    if !claim.evidence.is_empty() {
        return false;
    }
    if name == KEY_QUOTES_TRAIT && protect_key_quotes {
        // Protected but empty: the generic search may only append.
        return true;
    }
    true
}

/// Run the linker for one trait and turn matches into provenance-tagged
/// evidence items.
fn link_trait(
    name: &str,
    value: &str,
    scoped_text: &str,
    scope_meta: &ScopeMeta,
    linker: &dyn EvidenceLinker,
) -> Vec<EvidenceItem> {
    let quotes = linker.find_quotes(value, scoped_text, scope_meta, DEFAULT_MAX_QUOTES);
    if quotes.is_empty() {
        debug!(trait_name = name, "no evidence quotes found");
        return Vec::new();
    }

    let empty: Vec<personaforge_core::DocSpan> = Vec::new();
    let spans = scope_meta.doc_spans.as_ref().unwrap_or(&empty);

    quotes
        .into_iter()
        .filter(|m| !is_bad_evidence_line(&strip_highlighting(&m.quote)))
        .map(|m| {
            let (document_id, start_char, end_char) =
                map_to_document(m.global_start, m.global_end, spans);
            EvidenceItem {
                quote: m.quote,
                start_char,
                end_char,
                document_id,
                speaker: scope_meta.speaker.clone(),
            }
        })
        .collect()
}

/// Append new items, skipping duplicates of anything already attached.
fn merge_evidence(existing: &mut Vec<EvidenceItem>, found: Vec<EvidenceItem>) {
    let mut seen: HashSet<(String, String, usize)> =
        existing.iter().map(|e| e.dedupe_key()).collect();
    for item in found {
        if seen.insert(item.dedupe_key()) {
            existing.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::SpanAwareLinker;
    use crate::span_index::build_scoped_text_and_spans;
    use personaforge_core::{SpeakerRole, TranscriptSegment};

    fn segment(doc: &str, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            speaker: "Maria".to_string(),
            role: SpeakerRole::Participant,
            dialogue: text.to_string(),
            document_id: doc.to_string(),
            timestamp: None,
        }
    }

    fn scoped_scope() -> (String, ScopeMeta) {
        let (text, spans) = build_scoped_text_and_spans(&[
            segment("doc1", "I need a website for my cafe and I want it launched fast."),
            segment("doc2", "I spend about 10k EUR on tools every single year."),
        ]);
        let scope =
            ScopeMeta::for_speaker("Maria", SpeakerRole::Participant).with_doc_spans(spans);
        (text, scope)
    }

    #[test]
    fn test_attaches_evidence_with_provenance() {
        let (text, scope) = scoped_scope();
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "goals_and_motivations".to_string(),
            TraitClaim::new("needs a website fast", 0.8),
        );

        let map = attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);

        let evidence = &attributes["goals_and_motivations"].evidence;
        assert!(!evidence.is_empty());
        assert_eq!(evidence[0].document_id, "doc1");
        assert_eq!(evidence[0].speaker.as_deref(), Some("Maria"));
        assert_eq!(map["goals_and_motivations"], *evidence);
    }

    #[test]
    fn test_idempotent_attachment() {
        let (text, scope) = scoped_scope();
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "goals_and_motivations".to_string(),
            TraitClaim::new("needs a website fast", 0.8),
        );
        attributes.insert(
            "spending".to_string(),
            TraitClaim::new("spends 10k EUR on tools", 0.7),
        );

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);
        let counts: Vec<usize> = attributes.values().map(|c| c.evidence.len()).collect();

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);
        let counts_after: Vec<usize> = attributes.values().map(|c| c.evidence.len()).collect();
        assert_eq!(counts, counts_after);
    }

    #[test]
    fn test_key_quotes_protected() {
        let (text, scope) = scoped_scope();
        let curated = EvidenceItem {
            quote: "hand-picked quote".to_string(),
            start_char: 0,
            end_char: 17,
            document_id: "doc1".to_string(),
            speaker: Some("Maria".to_string()),
        };
        let mut claim = TraitClaim::new("website fast tools", 0.9);
        claim.evidence.push(curated.clone());
        let mut attributes = BTreeMap::new();
        attributes.insert(KEY_QUOTES_TRAIT.to_string(), claim);

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);

        let evidence = &attributes[KEY_QUOTES_TRAIT].evidence;
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0], curated);
    }

    #[test]
    fn test_empty_key_quotes_gets_appended() {
        let (text, scope) = scoped_scope();
        let mut attributes = BTreeMap::new();
        attributes.insert(
            KEY_QUOTES_TRAIT.to_string(),
            TraitClaim::new("website launched fast", 0.9),
        );

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);
        assert!(!attributes[KEY_QUOTES_TRAIT].evidence.is_empty());
    }

    #[test]
    fn test_disallowed_role_attaches_nothing() {
        let (text, spans) = build_scoped_text_and_spans(&[segment(
            "doc1",
            "I think the budget process needs a complete overhaul soon.",
        )]);
        let scope = ScopeMeta {
            speaker: Some("Researcher".to_string()),
            speaker_role: SpeakerRole::Researcher,
            document_id: None,
            doc_spans: Some(spans),
            stakeholder_category: None,
        };
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "challenges".to_string(),
            TraitClaim::new("budget process overhaul", 0.8),
        );

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);
        assert!(attributes["challenges"].evidence.is_empty());
    }

    #[test]
    fn test_evidence_present_short_circuit() {
        let (text, scope) = scoped_scope();
        let preexisting = EvidenceItem {
            quote: "already curated".to_string(),
            start_char: 0,
            end_char: 15,
            document_id: "doc9".to_string(),
            speaker: None,
        };
        let mut claim = TraitClaim::new("needs a website fast", 0.8);
        claim.evidence.push(preexisting.clone());
        let mut attributes = BTreeMap::new();
        attributes.insert("goals_and_motivations".to_string(), claim);

        attach_evidence(&mut attributes, &text, &scope, true, &SpanAwareLinker);
        assert_eq!(attributes["goals_and_motivations"].evidence, vec![preexisting]);
    }
}
