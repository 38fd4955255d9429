//! Core data model for PersonaForge
//!
//! Shared types used across the pipeline:
//! - Transcript segments and speaker scopes (input side)
//! - Document spans and evidence items (provenance bookkeeping)
//! - Trait claims and personas (output side)
//! - Feature-flag configuration
//!
//! The evidence-linking engine maps natural-language trait claims back onto
//! byte-accurate positions in the source transcript. Everything here is plain
//! data; the algorithms live in `personaforge-evidence` and
//! `personaforge-quality`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod attributes;
pub mod config;
pub mod influence;
pub mod transcript;

pub use attributes::parse_attributes;
pub use config::PipelineConfig;
pub use influence::{influence_metrics_for_role, InfluenceMetrics, StakeholderIntelligence};
pub use transcript::{group_by_speaker, parse_interview_transcript, SpeakerSegments};

/// Sentinel document id used when no per-document span data is available.
pub const ORIGINAL_TEXT_DOC_ID: &str = "original_text";

/// Separator between documents in a concatenated scoped text.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Joiner between fragments of the same document.
pub const FRAGMENT_JOINER: &str = "\n";

/// Trait name that receives special protection during evidence attachment.
pub const KEY_QUOTES_TRAIT: &str = "key_quotes";

/// Trait name with category-specific validation semantics.
pub const DEMOGRAPHICS_TRAIT: &str = "demographics";

// ============================================================================
// Transcript input
// ============================================================================

/// One turn of a transcript, attributed to a speaker and a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Speaker identifier or display name.
    #[serde(alias = "speaker_id")]
    pub speaker: String,
    /// Role of the speaker for this turn.
    #[serde(default)]
    pub role: SpeakerRole,
    /// The spoken text.
    #[serde(alias = "text")]
    pub dialogue: String,
    /// Source document this turn came from.
    #[serde(default = "default_document_id")]
    pub document_id: String,
    /// Optional timestamp label (e.g. "20:04").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

fn default_document_id() -> String {
    ORIGINAL_TEXT_DOC_ID.to_string()
}

impl TranscriptSegment {
    /// True when this turn is a question rather than a statement.
    pub fn is_question(&self) -> bool {
        let trimmed = self.dialogue.trim_end();
        trimmed.ends_with('?') || trimmed.ends_with('\u{FF1F}')
    }
}

/// Speaker role, used both for scope building and evidence hygiene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// The interviewee whose claims we extract evidence for.
    #[default]
    Participant,
    Interviewer,
    Researcher,
    Moderator,
    Unknown,
}

impl SpeakerRole {
    /// Roles whose dialogue must never be attributed as participant evidence.
    pub fn is_disallowed_for_evidence(&self) -> bool {
        matches!(
            self,
            SpeakerRole::Interviewer | SpeakerRole::Researcher | SpeakerRole::Moderator
        )
    }

    /// Infer a role from a speaker label ("Interviewer", "Q", "MODERATOR", ...).
    pub fn infer_from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "q" | "question" | "interviewer" | "int" => SpeakerRole::Interviewer,
            "researcher" => SpeakerRole::Researcher,
            "moderator" | "facilitator" | "host" => SpeakerRole::Moderator,
            "a" | "answer" | "participant" | "interviewee" | "respondent" => {
                SpeakerRole::Participant
            }
            _ => SpeakerRole::Participant,
        }
    }
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpeakerRole::Participant => "participant",
            SpeakerRole::Interviewer => "interviewer",
            SpeakerRole::Researcher => "researcher",
            SpeakerRole::Moderator => "moderator",
            SpeakerRole::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Provenance bookkeeping
// ============================================================================

/// Half-open range `[start, end)` into a scoped text identifying which source
/// document a substring came from.
///
/// Spans are listed in first-seen document order, never overlap, and the gap
/// between consecutive spans equals the document separator length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSpan {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
}

impl DocSpan {
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A verbatim quote plus its provenance.
///
/// `start_char`/`end_char` are local offsets within the named document, not
/// the concatenated scoped text. `document_id` is never empty; it defaults to
/// [`ORIGINAL_TEXT_DOC_ID`] when no span data was available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub quote: String,
    pub start_char: usize,
    pub end_char: usize,
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl EvidenceItem {
    /// Dedupe key: two items with the same key are the same piece of evidence.
    pub fn dedupe_key(&self) -> (String, String, usize) {
        (self.quote.clone(), self.document_id.clone(), self.start_char)
    }
}

// ============================================================================
// Persona output
// ============================================================================

/// One named attribute of a persona, with enough structure to carry
/// provenance back to the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitClaim {
    /// Natural-language description of the trait.
    pub value: String,
    /// Extraction confidence in [0, 1].
    pub confidence: f32,
    /// Supporting quotes, populated by the evidence attacher.
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
}

impl TraitClaim {
    pub fn new(value: impl Into<String>, confidence: f32) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            evidence: Vec::new(),
        }
    }
}

/// The context under which one extraction pass operates.
///
/// Controls both the search-space text and attribution tagging. Constructed
/// once per speaker segment, consumed read-only by the quote matcher and the
/// evidence attacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeMeta {
    pub speaker: Option<String>,
    pub speaker_role: SpeakerRole,
    pub document_id: Option<String>,
    pub doc_spans: Option<Vec<DocSpan>>,
    pub stakeholder_category: Option<String>,
}

impl ScopeMeta {
    pub fn for_speaker(speaker: &str, role: SpeakerRole) -> Self {
        Self {
            speaker: Some(speaker.to_string()),
            speaker_role: role,
            document_id: None,
            doc_spans: None,
            stakeholder_category: None,
        }
    }

    pub fn with_doc_spans(mut self, spans: Vec<DocSpan>) -> Self {
        self.doc_spans = Some(spans);
        self
    }

    pub fn with_stakeholder_category(mut self, category: &str) -> Self {
        self.stakeholder_category = Some(category.to_string());
        self
    }
}

/// A structured persona profile extracted from interview transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub archetype: String,
    /// Trait name -> claim. BTreeMap keeps output ordering stable.
    pub attributes: BTreeMap<String, TraitClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholder_intelligence: Option<StakeholderIntelligence>,
}

impl Persona {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            archetype: String::new(),
            attributes: BTreeMap::new(),
            stakeholder_intelligence: None,
        }
    }

    /// Total evidence items attached across all traits.
    pub fn evidence_count(&self) -> usize {
        self.attributes.values().map(|t| t.evidence.len()).sum()
    }

    /// Deterministic fallback persona used when generation fails or times out.
    pub fn fallback(speaker: &str) -> Self {
        let mut persona = Persona::new(speaker);
        persona.description = format!("Persona for {} (fallback, no attributes extracted)", speaker);
        persona.archetype = "unclassified".to_string();
        persona
    }
}
