//! Concurrent persona-generation pipeline
//!
//! Orchestrates the whole path from raw transcripts to evidence-grounded
//! personas:
//!
//! ```text
//! documents ──► parse ──► group by speaker ──► per-speaker tasks (bounded)
//!                                                    │
//!                             LLM extraction (fallback on failure)
//!                                                    │
//!                             evidence attachment + influence scoring
//!                                                    │
//!                  gather with exceptions ──► quality gate ──► dedup
//! ```
//!
//! A failed or timed-out speaker degrades to a fallback persona; sibling
//! tasks are never cancelled.

pub mod dedup;
pub mod events;
pub mod pipeline;
pub mod stages;

pub use dedup::dedup_personas;
pub use events::{EventEmitter, EventHandler, PipelineEvent};
pub use pipeline::PersonaPipeline;
pub use stages::{run_stages, PersonaStage, QualityGateStage};
