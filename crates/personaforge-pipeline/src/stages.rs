//! Post-processing stages
//!
//! Each stage is a pure `Persona -> Persona` transformation. The runner is
//! fail-open: a stage error is logged and the pre-stage persona continues
//! down the chain unmodified, so one broken enhancement never loses a
//! persona.

use personaforge_core::Persona;
use personaforge_quality::{apply_quality_gate, TraitAudit, TraitValidator};
use tracing::warn;

/// A pure persona transformation applied after generation.
pub trait PersonaStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, persona: Persona) -> anyhow::Result<Persona>;
}

/// Run stages in order, fail-open per stage.
pub fn run_stages(persona: Persona, stages: &[Box<dyn PersonaStage>]) -> Persona {
    let mut current = persona;
    for stage in stages {
        let before = current.clone();
        match stage.apply(current) {
            Ok(next) => current = next,
            Err(e) => {
                warn!(stage = stage.name(), error = %e, "stage failed, keeping persona unmodified");
                current = before;
            }
        }
    }
    current
}

/// Validation & regeneration quality gate as a stage.
pub struct QualityGateStage {
    validator: TraitValidator,
}

impl QualityGateStage {
    pub fn new(validator: TraitValidator) -> Self {
        Self { validator }
    }

    /// Gate one persona and return the per-trait audit trail alongside it.
    pub fn run(&self, persona: &Persona) -> (Persona, Vec<TraitAudit>) {
        apply_quality_gate(persona, &self.validator)
    }
}

impl PersonaStage for QualityGateStage {
    fn name(&self) -> &'static str {
        "quality_gate"
    }

    fn apply(&self, persona: Persona) -> anyhow::Result<Persona> {
        let (gated, _) = apply_quality_gate(&persona, &self.validator);
        Ok(gated)
    }
}
