//! `validate` command: audit evidence-to-claim alignment of personas JSON.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use personaforge_core::Persona;
use personaforge_quality::{detect_domain_terms, DomainKeywords, TraitValidator};
use std::collections::HashSet;
use std::path::PathBuf;

pub fn cmd_validate(input: &PathBuf, strict: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let personas: Vec<Persona> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", input.display()))?;

    let quotes: Vec<String> = personas
        .iter()
        .flat_map(|p| p.attributes.values())
        .flat_map(|c| c.evidence.iter())
        .map(|e| personaforge_evidence::strip_highlighting(&e.quote))
        .collect();
    let dynamic: HashSet<String> = detect_domain_terms(quotes.iter().map(|q| q.as_str()));
    let validator = TraitValidator::new(DomainKeywords::new().with_dynamic_terms(dynamic));

    let mut flagged = 0usize;
    for persona in &personas {
        println!("{}", persona.name.bold());
        for (name, claim) in &persona.attributes {
            let evidence: Vec<String> = claim.evidence.iter().map(|e| e.quote.clone()).collect();
            let result =
                validator.validate_trait_evidence(name, &claim.value, &evidence, claim.confidence);

            let marker = if result.needs_regeneration() {
                flagged += 1;
                "regen".red()
            } else if result.is_valid {
                "ok".green()
            } else {
                "weak".yellow()
            };
            println!(
                "  [{}] {} (overall {:.2}, alignment {:.2}, keywords {:.2})",
                marker,
                name,
                result.confidence_score,
                result.semantic_alignment_score,
                result.keyword_relevance_score
            );
            for issue in &result.issues {
                println!("        {} {}", "issue:".yellow(), issue);
            }
        }
    }

    println!(
        "\n{} {} trait(s) across {} persona(s) need regeneration",
        if flagged == 0 { "ok:".green() } else { "flagged:".red() },
        flagged,
        personas.len()
    );
    if strict && flagged > 0 {
        return Err(anyhow!("{} trait(s) failed validation", flagged));
    }
    Ok(())
}
