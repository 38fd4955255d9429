//! Validation & Regeneration Quality Gate
//!
//! Audits evidence-to-claim alignment for every persona trait and rewrites
//! weak claims from their own evidence. Three lexical scores (keyword
//! relevance, semantic alignment, evidence quality) combine into an overall
//! confidence; traits falling below thresholds are regenerated.
//!
//! All scoring here is deterministic lexical heuristics, on purpose: the
//! matching sophistication is keyword/word-set overlap, not a learned
//! similarity model.

pub mod demographics;
pub mod domain;
pub mod regenerate;
pub mod validator;

pub use demographics::{demographic_alignment, DemographicCategory};
pub use domain::{detect_domain_terms, DomainKeywords};
pub use regenerate::{apply_quality_gate, regenerate_trait, TraitAudit, INSUFFICIENT_EVIDENCE};
pub use validator::{TraitValidator, ValidationResult};
