//! Feature-flag configuration
//!
//! Flags are read from the environment once, at pipeline construction time.
//! Behavior variants (e.g. the v2 vs legacy evidence linker) are selected
//! when the pipeline is built, never re-checked per call.

use serde::{Deserialize, Serialize};

/// Pipeline-wide configuration, resolved once per top-level request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Use the span/offset-aware evidence matcher instead of the legacy one.
    pub evidence_linking_v2: bool,
    /// Run the validation & regeneration quality gate after attachment.
    pub quality_gate: bool,
    /// Merge personas whose speakers normalize to the same identity.
    pub persona_dedup: bool,
    /// Cap on how many speakers fan out into persona generation.
    pub max_personas: usize,
    /// Bound on concurrent LLM-calling units.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            evidence_linking_v2: true,
            quality_gate: true,
            persona_dedup: false,
            max_personas: 10,
            concurrency: 8,
        }
    }
}

impl PipelineConfig {
    /// Read recognized flags from the environment, falling back to defaults
    /// for anything missing or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            evidence_linking_v2: env_bool("EVIDENCE_LINKING_V2", defaults.evidence_linking_v2),
            quality_gate: env_bool("PERSONA_QUALITY_GATE", defaults.quality_gate),
            persona_dedup: env_bool("PERSONA_DEDUP", defaults.persona_dedup),
            max_personas: env_usize("MAX_PERSONAS", defaults.max_personas),
            concurrency: env_usize("PAID_TIER_CONCURRENCY", defaults.concurrency).max(1),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.evidence_linking_v2);
        assert!(config.quality_gate);
        assert!(!config.persona_dedup);
        assert_eq!(config.concurrency, 8);
    }

    #[test]
    fn test_env_bool_parsing() {
        std::env::set_var("PF_TEST_FLAG_ON", "true");
        std::env::set_var("PF_TEST_FLAG_OFF", "0");
        assert!(env_bool("PF_TEST_FLAG_ON", false));
        assert!(!env_bool("PF_TEST_FLAG_OFF", true));
        assert!(env_bool("PF_TEST_FLAG_MISSING", true));
    }
}
