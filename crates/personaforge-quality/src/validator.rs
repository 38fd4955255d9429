//! Per-trait evidence validation
//!
//! Scores one trait's evidence on three axes and combines them:
//! - keyword relevance (0.4): are highlighted terms domain vocabulary or
//!   generic stop-words
//! - semantic alignment (0.4): does the evidence lexically overlap with the
//!   claimed trait value (category-indicator matching for demographics)
//! - evidence quality (0.2): fraction of quotes of substantive length
//!
//! Purely computed, never mutates input. Scoring failures degrade the score,
//! never block evidence attachment.

use crate::demographics::demographic_alignment;
use crate::domain::{generic_words, DomainKeywords};
use personaforge_core::DEMOGRAPHICS_TRAIT;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Weights of the combined score.
const KEYWORD_WEIGHT: f32 = 0.4;
const ALIGNMENT_WEIGHT: f32 = 0.4;
const QUALITY_WEIGHT: f32 = 0.2;

/// Validity thresholds.
const MIN_OVERALL: f32 = 0.7;
const MIN_ALIGNMENT: f32 = 0.5;
const MAX_ISSUES: usize = 2;

/// Regeneration triggers.
const REGEN_ALIGNMENT: f32 = 0.5;
const REGEN_KEYWORD_RELEVANCE: f32 = 0.3;

/// Quotes shorter than this (cleaned) do not count as quality evidence.
const MIN_QUOTE_LEN: usize = 20;

/// Outcome of validating one trait's evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub confidence_score: f32,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub semantic_alignment_score: f32,
    pub keyword_relevance_score: f32,
}

impl ValidationResult {
    /// True when the trait should be rewritten from its evidence.
    pub fn needs_regeneration(&self) -> bool {
        self.semantic_alignment_score < REGEN_ALIGNMENT
            || self.keyword_relevance_score < REGEN_KEYWORD_RELEVANCE
            || !self.is_valid
    }
}

/// Validator configured with a domain-keyword oracle.
#[derive(Debug, Clone, Default)]
pub struct TraitValidator {
    domain: DomainKeywords,
}

impl TraitValidator {
    pub fn new(domain: DomainKeywords) -> Self {
        Self { domain }
    }

    /// Validate one trait's evidence against its description.
    pub fn validate_trait_evidence(
        &self,
        trait_name: &str,
        trait_description: &str,
        evidence_quotes: &[String],
        confidence: f32,
    ) -> ValidationResult {
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        let keyword_relevance =
            self.score_keyword_relevance(evidence_quotes, &mut issues, &mut suggestions);
        let alignment = score_semantic_alignment(trait_name, trait_description, evidence_quotes);
        let quality = score_evidence_quality(evidence_quotes);

        if alignment < MIN_ALIGNMENT {
            issues.push(format!(
                "evidence does not align with the claimed value of '{}'",
                trait_name
            ));
            suggestions.push("rewrite the trait value from its attached evidence".to_string());
        }
        if evidence_quotes.is_empty() {
            issues.push(format!("no evidence quotes attached to '{}'", trait_name));
        }

        let overall = KEYWORD_WEIGHT * keyword_relevance
            + ALIGNMENT_WEIGHT * alignment
            + QUALITY_WEIGHT * quality;
        let is_valid =
            overall >= MIN_OVERALL && alignment >= MIN_ALIGNMENT && issues.len() <= MAX_ISSUES;

        let _ = confidence; // reported upstream; validation is evidence-driven

        ValidationResult {
            is_valid,
            confidence_score: overall,
            issues,
            suggestions,
            semantic_alignment_score: alignment,
            keyword_relevance_score: keyword_relevance,
        }
    }

    /// Fraction of highlighted terms that are domain-relevant rather than
    /// generic stop-words.
    fn score_keyword_relevance(
        &self,
        evidence_quotes: &[String],
        issues: &mut Vec<String>,
        suggestions: &mut Vec<String>,
    ) -> f32 {
        let terms: Vec<String> = evidence_quotes
            .iter()
            .flat_map(|q| personaforge_evidence::highlighted_terms(q))
            .collect();
        if terms.is_empty() {
            return 0.0;
        }

        let generic: Vec<&String> = terms.iter().filter(|t| self.domain.is_generic(t)).collect();
        if !generic.is_empty() {
            issues.push(format!(
                "generic words highlighted as keywords: {}",
                generic
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            suggestions.push("highlight domain terms instead of stop-words".to_string());
        }

        let relevant = terms.iter().filter(|t| self.domain.is_relevant(t)).count();
        let score = relevant as f32 / terms.len() as f32;
        if score < REGEN_KEYWORD_RELEVANCE {
            issues.push("fewer than 30% of highlighted terms are domain-relevant".to_string());
        }
        score
    }
}

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("word regex is valid"))
}

/// Lexical overlap between the trait description and the joined evidence:
/// `min(2 * |D ∩ E| / |D|, 1.0)` over stop-word-stripped word sets.
/// Demographics instead checks category indicators.
fn score_semantic_alignment(
    trait_name: &str,
    trait_description: &str,
    evidence_quotes: &[String],
) -> f32 {
    let evidence_text: String = evidence_quotes
        .iter()
        .map(|q| personaforge_evidence::strip_highlighting(q))
        .collect::<Vec<_>>()
        .join(" ");

    if trait_name == DEMOGRAPHICS_TRAIT {
        return demographic_alignment(trait_description, &evidence_text);
    }

    let description_words = content_words(trait_description);
    if description_words.is_empty() {
        return 0.0;
    }
    let evidence_words = content_words(&evidence_text);
    let shared = description_words.intersection(&evidence_words).count();

    (2.0 * shared as f32 / description_words.len() as f32).min(1.0)
}

fn content_words(text: &str) -> HashSet<String> {
    let generic = generic_words();
    word_regex()
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|w| !generic.contains(w.as_str()))
        .collect()
}

/// Fraction of quotes that are substantively long once highlighting markers
/// and surrounding quote characters are stripped.
fn score_evidence_quality(evidence_quotes: &[String]) -> f32 {
    if evidence_quotes.is_empty() {
        return 0.0;
    }
    let substantive = evidence_quotes
        .iter()
        .map(|q| {
            personaforge_evidence::strip_highlighting(q)
                .trim()
                .trim_matches(|c| c == '"' || c == '\u{201C}' || c == '\u{201D}' || c == '\'')
                .len()
        })
        .filter(|len| *len >= MIN_QUOTE_LEN)
        .count();
    substantive as f32 / evidence_quotes.len() as f32
}
