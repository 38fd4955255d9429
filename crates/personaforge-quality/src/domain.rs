//! Domain keyword sets for keyword-relevance scoring
//!
//! Hand-curated, English-only lexical heuristics, preserved as-is: this is
//! configuration data, not a learned model. A dynamic set detected from a
//! sample of persona evidence can extend the base set; detection itself is a
//! fuzzy heuristic and its output is treated as just another input.

use std::collections::{HashMap, HashSet};

/// Words that should never count as meaningful highlights.
pub fn generic_words() -> &'static HashSet<&'static str> {
    static WORDS: std::sync::OnceLock<HashSet<&'static str>> = std::sync::OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "the", "a", "an", "and", "or", "but", "with", "about", "very", "really", "just",
            "also", "have", "has", "had", "want", "wants", "need", "needs", "will", "would",
            "could", "should", "thing", "things", "stuff", "good", "bad", "nice", "great",
            "make", "makes", "made", "get", "gets", "got", "lot", "lots", "many", "much",
            "some", "more", "most", "other", "another", "time", "times", "way", "ways",
            "people", "person", "something", "anything", "everything",
        ]
        .into_iter()
        .collect()
    })
}

/// Base domain-relevant keyword set for user-research interviews.
fn base_domain_keywords() -> &'static HashSet<&'static str> {
    static WORDS: std::sync::OnceLock<HashSet<&'static str>> = std::sync::OnceLock::new();
    WORDS.get_or_init(|| {
        [
            // Work and business
            "business", "company", "startup", "agency", "freelance", "client", "customer",
            "market", "revenue", "budget", "cost", "price", "pricing", "invoice", "contract",
            "team", "manager", "director", "founder", "owner", "employee", "colleague",
            // Product and tooling
            "website", "platform", "software", "tool", "tools", "app", "product", "service",
            "feature", "integration", "workflow", "process", "automation", "dashboard",
            "api", "data", "system", "technology", "digital", "online",
            // Research-relevant experience
            "experience", "years", "career", "industry", "role", "responsibility", "skills",
            "training", "education", "expertise", "broker", "policyholder", "insurance",
            // Goals and pains
            "goal", "goals", "growth", "efficiency", "productivity", "deadline", "pressure",
            "challenge", "problem", "issue", "frustration", "barrier", "risk", "support",
            // Demographic anchors
            "age", "family", "children", "city", "location", "income", "salary", "marketing",
            "design", "sales", "finance", "engineering", "cafe", "shop", "store",
        ]
        .into_iter()
        .collect()
    })
}

/// Domain-relevance oracle: the curated base set, optionally extended with
/// dynamically detected domain terms.
#[derive(Debug, Clone, Default)]
pub struct DomainKeywords {
    dynamic: HashSet<String>,
}

impl DomainKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend with a detected keyword set (see [`detect_domain_terms`]).
    pub fn with_dynamic_terms(mut self, terms: HashSet<String>) -> Self {
        self.dynamic = terms.into_iter().map(|t| t.to_lowercase()).collect();
        self
    }

    /// True when a highlighted term counts as domain-relevant.
    pub fn is_relevant(&self, term: &str) -> bool {
        let lower = term.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        base_domain_keywords().contains(lower.as_str()) || self.dynamic.contains(&lower)
    }

    /// True when a highlighted term is a generic stop-word.
    pub fn is_generic(&self, term: &str) -> bool {
        generic_words().contains(term.trim().to_lowercase().as_str())
    }
}

/// Minimum occurrences across a sample before a token counts as a domain term.
const DETECTION_MIN_OCCURRENCES: usize = 3;

/// Detect recurring domain terms from a sample of evidence quotes.
///
/// Fuzzy heuristic: tokens of length >= 4 that are neither generic nor
/// already in the base set, recurring across the sample, are assumed to be
/// vocabulary of the research domain under study.
pub fn detect_domain_terms<'a>(sample: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for quote in sample {
        for token in quote
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 4)
        {
            if generic_words().contains(token) || base_domain_keywords().contains(token) {
                continue;
            }
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n >= DETECTION_MIN_OCCURRENCES)
        .map(|(t, _)| t)
        .collect()
}
