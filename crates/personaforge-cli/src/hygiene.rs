//! `hygiene` command: per-line evidence hygiene report.

use anyhow::{Context, Result};
use colored::Colorize;
use personaforge_evidence::is_bad_evidence_line;
use std::path::PathBuf;

pub fn cmd_hygiene(input: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let mut rejected = 0usize;
    let mut total = 0usize;
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        if is_bad_evidence_line(line) {
            rejected += 1;
            println!("{} {:>4}: {}", "reject".red(), number + 1, line);
        } else {
            println!("{} {:>4}: {}", "accept".green(), number + 1, line);
        }
    }

    println!("\n{} of {} line(s) rejected", rejected, total);
    Ok(())
}
