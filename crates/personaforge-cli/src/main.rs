//! PersonaForge CLI
//!
//! Command-line interface for the evidence-linking engine:
//! - `link`: run the full transcript-to-persona pipeline
//! - `validate`: audit personas' evidence-to-claim alignment
//! - `hygiene`: check candidate evidence lines against the hygiene rules

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod hygiene;
mod link;
mod validate;

#[derive(Parser)]
#[command(name = "personaforge")]
#[command(
    author,
    version,
    about = "Evidence-grounded persona extraction from interview transcripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over transcript files and emit personas JSON.
    Link {
        /// Transcript files; each file is one source document.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output JSON path (stdout when omitted).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// LLM provider ("mock" or "openai" when compiled in).
        #[arg(long, default_value = "mock")]
        provider: String,
        /// Merge personas whose speaker names normalize identically.
        #[arg(long)]
        dedup: bool,
        /// Print progress events while running.
        #[arg(long)]
        progress: bool,
    },

    /// Validate personas JSON: per-trait alignment scores and issues.
    Validate {
        /// Personas JSON produced by `link`.
        input: PathBuf,
        /// Fail (exit non-zero) when any trait needs regeneration.
        #[arg(long)]
        strict: bool,
    },

    /// Check each line of a file against the evidence hygiene rules.
    Hygiene {
        /// Text file with one candidate evidence line per line.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Link {
            inputs,
            out,
            provider,
            dedup,
            progress,
        } => link::cmd_link(&inputs, out.as_ref(), &provider, dedup, progress),
        Commands::Validate { input, strict } => validate::cmd_validate(&input, strict),
        Commands::Hygiene { input } => hygiene::cmd_hygiene(&input),
    }
}
