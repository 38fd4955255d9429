//! Evidence linker strategies
//!
//! Two interchangeable implementations of the same interface, selected once
//! at pipeline construction from configuration (never re-checked per call):
//!
//! - [`SpanAwareLinker`]: the full two-tier matcher with first-person
//!   preference and keyword highlighting.
//! - [`LegacyLinker`]: the pre-span-index matcher. Plain substring scan over
//!   lines, no highlighting, kept for rollback.

use crate::matcher::{find_evidence_quotes, QuoteMatch};
use personaforge_core::{PipelineConfig, ScopeMeta};

/// Strategy interface for finding evidence quotes in a scoped text.
pub trait EvidenceLinker: Send + Sync {
    fn name(&self) -> &'static str;

    fn find_quotes(
        &self,
        trait_value: &str,
        scoped_text: &str,
        scope_meta: &ScopeMeta,
        max_quotes: usize,
    ) -> Vec<QuoteMatch>;
}

/// The span/offset-aware matcher (v2).
pub struct SpanAwareLinker;

impl EvidenceLinker for SpanAwareLinker {
    fn name(&self) -> &'static str {
        "span_aware"
    }

    fn find_quotes(
        &self,
        trait_value: &str,
        scoped_text: &str,
        scope_meta: &ScopeMeta,
        max_quotes: usize,
    ) -> Vec<QuoteMatch> {
        find_evidence_quotes(trait_value, scoped_text, scope_meta, max_quotes)
    }
}

/// The legacy matcher: line-based substring containment, no refinements.
pub struct LegacyLinker;

impl EvidenceLinker for LegacyLinker {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn find_quotes(
        &self,
        trait_value: &str,
        scoped_text: &str,
        _scope_meta: &ScopeMeta,
        max_quotes: usize,
    ) -> Vec<QuoteMatch> {
        if trait_value.trim().is_empty() || scoped_text.trim().is_empty() {
            return Vec::new();
        }
        let keywords = crate::keywords::extract_keywords(trait_value);
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut cursor = 0;
        for line in scoped_text.split('\n') {
            let start = cursor;
            cursor += line.len() + 1;

            let trimmed = line.trim();
            if trimmed.len() < 20 {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if keywords.iter().any(|kw| lower.contains(kw.as_str())) {
                let lead = line.len() - line.trim_start().len();
                matches.push(QuoteMatch {
                    quote: trimmed.to_string(),
                    global_start: start + lead,
                    global_end: start + lead + trimmed.len(),
                });
                if matches.len() >= max_quotes {
                    break;
                }
            }
        }
        matches
    }
}

/// Pick the linker variant once, from configuration.
pub fn select_linker(config: &PipelineConfig) -> Box<dyn EvidenceLinker> {
    if config.evidence_linking_v2 {
        Box::new(SpanAwareLinker)
    } else {
        Box::new(LegacyLinker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personaforge_core::SpeakerRole;

    #[test]
    fn test_select_linker_from_config() {
        let mut config = PipelineConfig::default();
        config.evidence_linking_v2 = true;
        assert_eq!(select_linker(&config).name(), "span_aware");
        config.evidence_linking_v2 = false;
        assert_eq!(select_linker(&config).name(), "legacy");
    }

    #[test]
    fn test_legacy_linker_substring_scan() {
        let scope = ScopeMeta::for_speaker("Maria", SpeakerRole::Participant);
        let text = "short\nI spend most of my budget on design software each year.";
        let matches = LegacyLinker.find_quotes("budget software", text, &scope, 3);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            &text[matches[0].global_start..matches[0].global_end],
            "I spend most of my budget on design software each year."
        );
        // Legacy output carries no highlighting markers.
        assert!(!matches[0].quote.contains("**"));
    }
}
