//! Evidence-derived trait regeneration
//!
//! When validation flags a trait, its descriptive value is rewritten to be
//! consistent with the evidence already attached. Regeneration never
//! fabricates evidence: with sufficient quotes the value becomes a templated
//! evidence-derived summary, otherwise the trait is explicitly marked as
//! insufficiently evidenced. The evidence list itself is never touched.

use crate::validator::{TraitValidator, ValidationResult};
use personaforge_core::{Persona, TraitClaim, DEMOGRAPHICS_TRAIT};
use personaforge_evidence::strip_highlighting;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker value for traits whose evidence cannot support any claim.
pub const INSUFFICIENT_EVIDENCE: &str = "insufficient evidence";

/// Confidence ceiling applied when a trait is marked insufficient.
const INSUFFICIENT_CONFIDENCE: f32 = 0.3;

/// Quotes shorter than this do not count toward "sufficient evidence".
const MIN_USEFUL_QUOTE_LEN: usize = 20;

/// Max quotes folded into a regenerated summary.
const SUMMARY_QUOTES: usize = 2;

/// Audit record for one validated trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitAudit {
    pub trait_name: String,
    pub validation: ValidationResult,
    pub regenerated: bool,
}

/// Rewrite a flagged trait's value from its own evidence.
///
/// Returns the replacement claim; the caller decides whether to apply it.
pub fn regenerate_trait(trait_name: &str, claim: &TraitClaim) -> TraitClaim {
    let quotes: Vec<String> = claim
        .evidence
        .iter()
        .map(|e| strip_highlighting(&e.quote).trim().to_string())
        .filter(|q| q.len() >= MIN_USEFUL_QUOTE_LEN)
        .collect();

    if quotes.is_empty() {
        let mut replacement = claim.clone();
        replacement.value = INSUFFICIENT_EVIDENCE.to_string();
        replacement.confidence = claim.confidence.min(INSUFFICIENT_CONFIDENCE);
        return replacement;
    }

    let summary = quotes
        .iter()
        .take(SUMMARY_QUOTES)
        .map(|q| format!("\"{}\"", q))
        .collect::<Vec<_>>()
        .join("; ");

    let mut replacement = claim.clone();
    replacement.value = summary_template(trait_name, &summary);
    replacement
}

/// Templated summary per trait category.
fn summary_template(trait_name: &str, summary: &str) -> String {
    let lower = trait_name.to_lowercase();
    if lower == DEMOGRAPHICS_TRAIT {
        format!("Self-described background: {}", summary)
    } else if lower.contains("goal") || lower.contains("motivation") {
        format!("Goals stated in their own words: {}", summary)
    } else if lower.contains("challenge") || lower.contains("pain") {
        format!("Challenges reported first-hand: {}", summary)
    } else {
        format!("Based on transcript evidence: {}", summary)
    }
}

/// Run the quality gate over a whole persona: validate every trait,
/// regenerate the flagged ones, return the new persona plus audits.
///
/// Pure transformation, fail-open per trait: the input persona is never
/// mutated and an unflagged trait passes through unchanged.
pub fn apply_quality_gate(persona: &Persona, validator: &TraitValidator) -> (Persona, Vec<TraitAudit>) {
    let mut gated = persona.clone();
    let mut audits = Vec::with_capacity(persona.attributes.len());

    for (name, claim) in &persona.attributes {
        let quotes: Vec<String> = claim.evidence.iter().map(|e| e.quote.clone()).collect();
        let validation =
            validator.validate_trait_evidence(name, &claim.value, &quotes, claim.confidence);

        let regenerated = validation.needs_regeneration();
        if regenerated {
            debug!(trait_name = name.as_str(), "regenerating flagged trait");
            gated
                .attributes
                .insert(name.clone(), regenerate_trait(name, claim));
        }
        audits.push(TraitAudit {
            trait_name: name.clone(),
            validation,
            regenerated,
        });
    }

    (gated, audits)
}
