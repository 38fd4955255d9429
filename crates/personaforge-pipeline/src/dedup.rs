//! Persona deduplication
//!
//! Multiple documents naming the same speaker produce one persona per
//! document; when the dedup flag is on they are merged. Identity is the
//! whitespace-normalized lowercase speaker name. The persona with more
//! attached evidence wins; the loser's traits and evidence fold into it
//! without duplicating offsets.

use personaforge_core::Persona;
use std::collections::{HashMap, HashSet};

/// Merge personas whose names normalize to the same identity, preserving
/// first-seen order of the surviving personas.
pub fn dedup_personas(personas: Vec<Persona>) -> Vec<Persona> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, Persona> = HashMap::new();

    for persona in personas {
        let key = normalize_name(&persona.name);
        match merged.remove(&key) {
            None => {
                order.push(key.clone());
                merged.insert(key, persona);
            }
            Some(existing) => {
                let combined = merge_pair(existing, persona);
                merged.insert(key, combined);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Merge two personas for the same identity. The one with more evidence is
/// the base; the other contributes any traits the base lacks plus deduped
/// evidence for shared traits.
fn merge_pair(a: Persona, b: Persona) -> Persona {
    let (mut base, other) = if b.evidence_count() > a.evidence_count() {
        (b, a)
    } else {
        (a, b)
    };

    for (name, claim) in other.attributes {
        match base.attributes.get_mut(&name) {
            None => {
                base.attributes.insert(name, claim);
            }
            Some(existing) => {
                let mut seen: HashSet<_> =
                    existing.evidence.iter().map(|e| e.dedupe_key()).collect();
                for item in claim.evidence {
                    if seen.insert(item.dedupe_key()) {
                        existing.evidence.push(item);
                    }
                }
            }
        }
    }

    if base.stakeholder_intelligence.is_none() {
        base.stakeholder_intelligence = other.stakeholder_intelligence;
    }
    base
}
