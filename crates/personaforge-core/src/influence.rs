//! Stakeholder influence metrics
//!
//! Role/keyword heuristic scoring, consumed as-is by callers. Lexical by
//! design; these are coarse signals, not a learned model.

use serde::{Deserialize, Serialize};

/// Influence scores for a stakeholder, each in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceMetrics {
    pub decision_power: f32,
    pub technical_influence: f32,
    pub budget_influence: f32,
}

/// Optional stakeholder-level intelligence attached to a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderIntelligence {
    pub influence_metrics: InfluenceMetrics,
}

/// Score influence from a stakeholder category label and the speaker's own
/// dialogue. Unknown categories get neutral baselines nudged by keywords.
pub fn influence_metrics_for_role(category: Option<&str>, dialogue: &str) -> InfluenceMetrics {
    let lower = dialogue.to_lowercase();

    let (mut decision, mut technical, mut budget): (f32, f32, f32) = match category {
        Some("decision_maker") => (0.8, 0.3, 0.7),
        Some("technical") => (0.4, 0.8, 0.3),
        Some("end_user") => (0.2, 0.4, 0.1),
        Some("influencer") => (0.5, 0.5, 0.3),
        _ => (0.3, 0.3, 0.3),
    };

    if lower.contains("budget") || lower.contains("cost") || lower.contains("spend") {
        budget += 0.2;
    }
    if lower.contains("approve") || lower.contains("decide") || lower.contains("final say") {
        decision += 0.2;
    }
    if lower.contains("api") || lower.contains("integration") || lower.contains("architecture") {
        technical += 0.2;
    }

    InfluenceMetrics {
        decision_power: decision.min(1.0),
        technical_influence: technical.min(1.0),
        budget_influence: budget.min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_maker_profile() {
        let metrics = influence_metrics_for_role(Some("decision_maker"), "I approve the budget");
        assert!(metrics.decision_power > 0.8);
        assert!(metrics.budget_influence > 0.8);
        assert!(metrics.decision_power <= 1.0);
    }

    #[test]
    fn test_unknown_category_neutral() {
        let metrics = influence_metrics_for_role(None, "hello there");
        assert!((metrics.decision_power - 0.3).abs() < 1e-6);
        assert!((metrics.technical_influence - 0.3).abs() < 1e-6);
    }
}
