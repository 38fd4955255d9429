//! Persona-generation orchestrator
//!
//! Fans interview transcripts out into per-speaker persona generation:
//!
//! 1. Parse documents into segments and group them by speaker.
//! 2. For each participant speaker (up to the persona cap), run a bounded
//!    concurrent task: LLM attribute extraction (with deterministic fallback
//!    on failure), evidence attachment, influence scoring.
//! 3. Gather with exceptions: a failed or timed-out speaker yields a fallback
//!    persona and never cancels its siblings.
//! 4. Apply the quality gate and optional dedup, emitting progress events.

use crate::dedup::dedup_personas;
use crate::events::{EventEmitter, EventHandler, PipelineEvent};
use crate::stages::{run_stages, PersonaStage, QualityGateStage};
use personaforge_core::transcript::{infer_stakeholder_category, SpeakerSegments};
use personaforge_core::{
    group_by_speaker, influence_metrics_for_role, parse_attributes, parse_interview_transcript,
    Persona, PipelineConfig, ScopeMeta, StakeholderIntelligence, TranscriptSegment,
};
use personaforge_evidence::{attach_evidence, select_linker, EvidenceLinker};
use personaforge_llm::{AnalyzeRequest, LlmInterface};
use personaforge_quality::{detect_domain_terms, DomainKeywords, TraitValidator};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Hard ceiling on one speaker's generation, LLM latency included.
const PER_SPEAKER_TIMEOUT: Duration = Duration::from_secs(120);

const PERSONA_PROMPT: &str = "Extract a persona profile for the given speaker from the \
transcript below. Return JSON with fields: description (string), archetype (string), \
attributes (object mapping trait names such as demographics, goals_and_motivations, \
challenges, key_quotes to {value, confidence} objects). Only use statements made by \
this speaker.";

/// The persona-generation pipeline. Configuration and behavior variants are
/// resolved once at construction.
pub struct PersonaPipeline {
    config: PipelineConfig,
    provider: Arc<dyn LlmInterface>,
    linker: Arc<dyn EvidenceLinker>,
    emitter: Arc<EventEmitter>,
    extra_stages: Vec<Box<dyn PersonaStage>>,
}

impl PersonaPipeline {
    pub fn new(config: PipelineConfig, provider: Arc<dyn LlmInterface>) -> Self {
        let linker: Arc<dyn EvidenceLinker> = Arc::from(select_linker(&config));
        Self {
            config,
            provider,
            linker,
            emitter: Arc::new(EventEmitter::new()),
            extra_stages: Vec::new(),
        }
    }

    /// Register a progress-event handler. Must be called before `run`.
    pub fn on_event(&mut self, handler: EventHandler) {
        Arc::get_mut(&mut self.emitter)
            .map(|e| e.register(handler))
            .unwrap_or_else(|| warn!("event handler registered after pipeline started, ignored"));
    }

    /// Append a custom post-processing stage, applied after the quality gate.
    pub fn add_stage(&mut self, stage: Box<dyn PersonaStage>) {
        self.extra_stages.push(stage);
    }

    /// Run the pipeline over `(document_id, text)` pairs and return one
    /// persona per distinct participant speaker.
    pub async fn run(&self, documents: &[(String, String)]) -> anyhow::Result<Vec<Persona>> {
        let mut segments: Vec<TranscriptSegment> = Vec::new();
        for (document_id, text) in documents {
            segments.extend(parse_interview_transcript(text, document_id));
        }

        let speakers: Vec<SpeakerSegments> = group_by_speaker(&segments)
            .into_iter()
            .filter(|s| !s.role.is_disallowed_for_evidence())
            .take(self.config.max_personas)
            .collect();

        self.emitter.emit(PipelineEvent::Started {
            speakers: speakers.len(),
        });

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut handles = Vec::with_capacity(speakers.len());
        for speaker in speakers {
            let semaphore = Arc::clone(&semaphore);
            let provider = Arc::clone(&self.provider);
            let linker = Arc::clone(&self.linker);
            let emitter = Arc::clone(&self.emitter);
            let name = speaker.speaker.clone();

            handles.push((
                name.clone(),
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| anyhow::anyhow!("semaphore closed: {}", e))?;
                    emitter.emit(PipelineEvent::SpeakerStarted {
                        speaker: name.clone(),
                    });
                    match tokio::time::timeout(
                        PER_SPEAKER_TIMEOUT,
                        generate_for_speaker(speaker, provider, linker),
                    )
                    .await
                    {
                        Ok(persona) => {
                            emitter.emit(PipelineEvent::PersonaGenerated {
                                speaker: name,
                                traits: persona.attributes.len(),
                                evidence_items: persona.evidence_count(),
                            });
                            Ok(persona)
                        }
                        Err(_) => Err(anyhow::anyhow!("speaker generation timed out")),
                    }
                }),
            ));
        }

        // Gather with exceptions: any failure degrades to a fallback persona.
        let mut personas = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let persona = match handle.await {
                Ok(Ok(persona)) => persona,
                Ok(Err(e)) => {
                    self.emitter.emit(PipelineEvent::SpeakerFailed {
                        speaker: name.clone(),
                        reason: e.to_string(),
                    });
                    Persona::fallback(&name)
                }
                Err(e) => {
                    self.emitter.emit(PipelineEvent::SpeakerFailed {
                        speaker: name.clone(),
                        reason: format!("task panicked: {}", e),
                    });
                    Persona::fallback(&name)
                }
            };
            personas.push(persona);
        }

        if self.config.quality_gate {
            personas = self.apply_quality_gate(personas);
        }
        personas = personas
            .into_iter()
            .map(|p| run_stages(p, &self.extra_stages))
            .collect();

        if self.config.persona_dedup {
            let before = personas.len();
            personas = dedup_personas(personas);
            if personas.len() != before {
                self.emitter.emit(PipelineEvent::PersonasDeduplicated {
                    before,
                    after: personas.len(),
                });
            }
        }

        info!(personas = personas.len(), "pipeline run complete");
        self.emitter.emit(PipelineEvent::Completed {
            personas: personas.len(),
        });
        Ok(personas)
    }

    /// Validate and regenerate traits across all personas. The domain
    /// vocabulary is extended with terms detected from the run's own
    /// evidence before scoring.
    fn apply_quality_gate(&self, personas: Vec<Persona>) -> Vec<Persona> {
        let quotes: Vec<String> = personas
            .iter()
            .flat_map(|p| p.attributes.values())
            .flat_map(|c| c.evidence.iter())
            .map(|e| personaforge_evidence::strip_highlighting(&e.quote))
            .collect();
        let dynamic: HashSet<String> = detect_domain_terms(quotes.iter().map(|q| q.as_str()));
        let validator = TraitValidator::new(DomainKeywords::new().with_dynamic_terms(dynamic));
        let gate = QualityGateStage::new(validator);

        personas
            .into_iter()
            .map(|persona| {
                let speaker = persona.name.clone();
                let (gated, audits) = gate.run(&persona);
                let regenerated = audits.iter().filter(|a| a.regenerated).count();
                if regenerated > 0 {
                    self.emitter.emit(PipelineEvent::QualityGateApplied {
                        speaker,
                        regenerated_traits: regenerated,
                    });
                }
                gated
            })
            .collect()
    }
}

/// Generate one persona for one speaker. Never fails outright: LLM errors
/// and unusable responses degrade to deterministic pattern extraction.
async fn generate_for_speaker(
    speaker: SpeakerSegments,
    provider: Arc<dyn LlmInterface>,
    linker: Arc<dyn EvidenceLinker>,
) -> Persona {
    let (scoped_text, spans) = personaforge_evidence::build_scoped_text_and_spans(&speaker.segments);
    let category = infer_stakeholder_category(&scoped_text);

    let mut scope = ScopeMeta::for_speaker(&speaker.speaker, speaker.role).with_doc_spans(spans);
    if let Some(category) = &category {
        scope = scope.with_stakeholder_category(category);
    }

    let mut persona = Persona::new(&speaker.speaker);
    let request = AnalyzeRequest::new(PERSONA_PROMPT)
        .with_context("speaker", &speaker.speaker)
        .with_context("transcript", &scoped_text);

    match provider.analyze(request).await {
        Ok(response) => {
            if let Some(description) = response.get("description").and_then(|v| v.as_str()) {
                persona.description = description.to_string();
            }
            if let Some(archetype) = response.get("archetype").and_then(|v| v.as_str()) {
                persona.archetype = archetype.to_string();
            }
            let payload = response.get("attributes").unwrap_or(&response);
            persona.attributes = parse_attributes(payload);
        }
        Err(e) => {
            warn!(speaker = speaker.speaker.as_str(), error = %e, "LLM extraction failed");
        }
    }
    if persona.attributes.is_empty() {
        persona.attributes = personaforge_llm::extract_fallback_attributes(&speaker);
        if persona.description.is_empty() {
            persona.description = format!("Persona for {} (pattern-extracted)", speaker.speaker);
        }
    }

    attach_evidence(
        &mut persona.attributes,
        &scoped_text,
        &scope,
        true,
        linker.as_ref(),
    );

    persona.stakeholder_intelligence = Some(StakeholderIntelligence {
        influence_metrics: influence_metrics_for_role(category.as_deref(), &scoped_text),
    });
    persona
}
