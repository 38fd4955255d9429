//! Evidence Linking & Grounding Engine
//!
//! Maps natural-language trait claims produced by an upstream LLM back onto
//! byte-accurate positions in the source transcript, under strict
//! correctness rules: no hallucinated quotes, no cross-speaker
//! contamination, no duplicate offsets.
//!
//! ```text
//! Transcript segments
//!        │
//!        ▼
//!  ┌──────────────┐   scoped text + span index
//!  │  Span Index  │──────────────────────────────┐
//!  └──────────────┘                              │
//!                                                ▼
//!  Trait claims ──► Quote Matcher ──► Hygiene ──► Offset Mapper ──► Attacher
//!                   (keyword /        (reject      (global → per-    (merge into
//!                    lexical tiers)    questions,   document          trait claims,
//!                                      interviewer  offsets)          dedupe)
//!                                      lines)
//! ```
//!
//! Everything in this crate is pure, synchronous, CPU-only string work; the
//! LLM boundary lives elsewhere. All entry points are total over reasonable
//! garbage input: they degrade to empty results rather than raise.

pub mod attacher;
pub mod highlight;
pub mod hygiene;
pub mod keywords;
pub mod linker;
pub mod matcher;
pub mod span_index;

pub use attacher::attach_evidence;
pub use highlight::{highlight_keywords, highlighted_terms, strip_highlighting};
pub use hygiene::is_bad_evidence_line;
pub use keywords::extract_keywords;
pub use linker::{select_linker, EvidenceLinker, LegacyLinker, SpanAwareLinker};
pub use matcher::{find_evidence_quotes, QuoteMatch, DEFAULT_MAX_QUOTES};
pub use span_index::{build_scoped_text_and_spans, map_to_document};
