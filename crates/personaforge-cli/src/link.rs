//! `link` command: transcripts in, evidence-grounded personas out.

use anyhow::{Context, Result};
use colored::Colorize;
use personaforge_core::PipelineConfig;
use personaforge_llm::create_provider;
use personaforge_pipeline::{PersonaPipeline, PipelineEvent};
use std::path::PathBuf;
use std::sync::Arc;

pub fn cmd_link(
    inputs: &[PathBuf],
    out: Option<&PathBuf>,
    provider_name: &str,
    dedup: bool,
    progress: bool,
) -> Result<()> {
    let mut documents = Vec::with_capacity(inputs.len());
    for path in inputs {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading transcript {}", path.display()))?;
        let document_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        documents.push((document_id, text));
    }

    let mut config = PipelineConfig::from_env();
    if dedup {
        config.persona_dedup = true;
    }

    let provider = create_provider(provider_name).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut pipeline = PersonaPipeline::new(config, Arc::from(provider));
    if progress {
        pipeline.on_event(Box::new(print_event));
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let personas = runtime.block_on(pipeline.run(&documents))?;

    let rendered = serde_json::to_string_pretty(&personas)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} {} personas -> {}",
                "wrote".green(),
                personas.len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::Started { speakers } => {
            eprintln!("{} {} speaker(s)", "started".cyan(), speakers);
        }
        PipelineEvent::SpeakerStarted { speaker } => {
            eprintln!("  {} {}", "generating".cyan(), speaker);
        }
        PipelineEvent::PersonaGenerated {
            speaker,
            traits,
            evidence_items,
        } => {
            eprintln!(
                "  {} {} ({} traits, {} evidence items)",
                "done".green(),
                speaker,
                traits,
                evidence_items
            );
        }
        PipelineEvent::SpeakerFailed { speaker, reason } => {
            eprintln!("  {} {}: {}", "failed".red(), speaker, reason);
        }
        PipelineEvent::QualityGateApplied {
            speaker,
            regenerated_traits,
        } => {
            eprintln!(
                "  {} {} ({} trait(s) regenerated)",
                "quality gate".yellow(),
                speaker,
                regenerated_traits
            );
        }
        PipelineEvent::PersonasDeduplicated { before, after } => {
            eprintln!("{} {} -> {}", "deduplicated".yellow(), before, after);
        }
        PipelineEvent::Completed { personas } => {
            eprintln!("{} {} persona(s)", "completed".green(), personas);
        }
    }
}
