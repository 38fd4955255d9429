//! Boundary parsing of LLM-produced attribute payloads
//!
//! Upstream LLM output arrives as loosely-shaped JSON: trait values may be
//! bare strings, `{value, confidence}` maps, and evidence entries may be bare
//! strings instead of structured items. That shape-checking happens exactly
//! once, here; internal pipeline code only ever sees [`TraitClaim`]s.

use crate::{EvidenceItem, TraitClaim, ORIGINAL_TEXT_DOC_ID};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse an attributes payload (trait name -> loosely shaped claim) into the
/// strict internal representation.
///
/// Total over reasonable garbage: unrecognized shapes are skipped, never
/// propagated as errors.
pub fn parse_attributes(payload: &Value) -> BTreeMap<String, TraitClaim> {
    let mut attributes = BTreeMap::new();
    let Some(map) = payload.as_object() else {
        return attributes;
    };

    for (name, raw) in map {
        if let Some(claim) = parse_claim(raw) {
            attributes.insert(name.clone(), claim);
        }
    }
    attributes
}

fn parse_claim(raw: &Value) -> Option<TraitClaim> {
    match raw {
        // Bare string: value with neutral confidence.
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(TraitClaim::new(trimmed, 0.5))
            }
        }
        Value::Object(obj) => {
            let value = obj.get("value").and_then(|v| v.as_str())?.trim().to_string();
            if value.is_empty() {
                return None;
            }
            let confidence = obj
                .get("confidence")
                .and_then(|c| c.as_f64())
                .unwrap_or(0.5) as f32;
            let evidence = obj
                .get("evidence")
                .and_then(|e| e.as_array())
                .map(|items| items.iter().filter_map(parse_evidence_entry).collect())
                .unwrap_or_default();

            let mut claim = TraitClaim::new(value, confidence);
            claim.evidence = evidence;
            Some(claim)
        }
        _ => None,
    }
}

/// Evidence entries may be bare quote strings (legacy shape) or structured
/// items. Bare strings get the sentinel document id and zero offsets.
fn parse_evidence_entry(raw: &Value) -> Option<EvidenceItem> {
    match raw {
        Value::String(quote) => {
            let trimmed = quote.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(EvidenceItem {
                quote: trimmed.to_string(),
                start_char: 0,
                end_char: trimmed.len(),
                document_id: ORIGINAL_TEXT_DOC_ID.to_string(),
                speaker: None,
            })
        }
        Value::Object(_) => {
            let mut item: EvidenceItem = serde_json::from_value(raw.clone()).ok()?;
            if item.document_id.trim().is_empty() {
                item.document_id = ORIGINAL_TEXT_DOC_ID.to_string();
            }
            Some(item)
        }
        _ => None,
    }
}
