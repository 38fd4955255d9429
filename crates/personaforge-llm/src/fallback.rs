//! Deterministic fallback extraction
//!
//! When the LLM is unavailable or its response is unusable, persona
//! attributes are extracted directly from the speaker's own sentences with
//! first-person pattern matching. The result is deliberately conservative:
//! low confidence, only claims the transcript states outright.

use personaforge_core::transcript::SpeakerSegments;
use personaforge_core::TraitClaim;
use std::collections::BTreeMap;

/// Confidence assigned to pattern-extracted claims.
const FALLBACK_CONFIDENCE: f32 = 0.4;

/// Max sentences folded into one fallback claim.
const MAX_SENTENCES_PER_TRAIT: usize = 3;

/// Extract a minimal attribute set from a speaker's own dialogue.
///
/// Total over any input; an empty map means nothing was stated plainly
/// enough to claim.
pub fn extract_fallback_attributes(speaker: &SpeakerSegments) -> BTreeMap<String, TraitClaim> {
    let sentences = speaker_sentences(speaker);
    let mut attributes = BTreeMap::new();

    let goal_markers = [
        "i want", "i need", "i'm trying", "i am trying", "my goal", "i hope", "i plan",
    ];
    let challenge_markers = [
        "i struggle",
        "the problem",
        "my problem",
        "it's hard",
        "it is hard",
        "i can't",
        "i cannot",
        "frustrat",
        "difficult",
    ];
    let demographic_markers = [
        "i am a", "i'm a", "i work as", "i run", "i own", "years of experience", "my company",
    ];

    if let Some(value) = collect_matching(&sentences, &goal_markers) {
        attributes.insert(
            "goals_and_motivations".to_string(),
            TraitClaim::new(value, FALLBACK_CONFIDENCE),
        );
    }
    if let Some(value) = collect_matching(&sentences, &challenge_markers) {
        attributes.insert(
            "challenges".to_string(),
            TraitClaim::new(value, FALLBACK_CONFIDENCE),
        );
    }
    if let Some(value) = collect_matching(&sentences, &demographic_markers) {
        attributes.insert(
            "demographics".to_string(),
            TraitClaim::new(value, FALLBACK_CONFIDENCE),
        );
    }

    attributes
}

fn speaker_sentences(speaker: &SpeakerSegments) -> Vec<String> {
    speaker
        .segments
        .iter()
        .filter(|s| !s.is_question())
        .flat_map(|s| {
            s.dialogue
                .split(['.', '!', '?'])
                .map(|part| part.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn collect_matching(sentences: &[String], markers: &[&str]) -> Option<String> {
    let matched: Vec<&String> = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            markers.iter().any(|m| lower.contains(m))
        })
        .take(MAX_SENTENCES_PER_TRAIT)
        .collect();

    if matched.is_empty() {
        return None;
    }
    Some(
        matched
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(". "),
    )
}
