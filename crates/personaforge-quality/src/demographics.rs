//! Demographic category indicators
//!
//! The demographics trait gets category-specific alignment instead of the
//! generic word-overlap score: for each demographic category the description
//! claims, the same category must be evidenced in the quotes.
//!
//! Hand-curated indicator lists, preserved as lexical heuristics by design.

/// Demographic categories with their indicator words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemographicCategory {
    Age,
    Profession,
    Experience,
    Location,
    Income,
    Family,
    Technology,
}

impl DemographicCategory {
    pub const ALL: [DemographicCategory; 7] = [
        DemographicCategory::Age,
        DemographicCategory::Profession,
        DemographicCategory::Experience,
        DemographicCategory::Location,
        DemographicCategory::Income,
        DemographicCategory::Family,
        DemographicCategory::Technology,
    ];

    pub fn indicators(&self) -> &'static [&'static str] {
        match self {
            DemographicCategory::Age => &["age", "years old", "yo", "born", "twenties", "thirties", "forties", "fifties"],
            DemographicCategory::Profession => &["profession", "job", "work as", "works as", "role", "manager", "engineer", "designer", "broker", "owner", "founder", "director", "consultant", "teacher", "nurse"],
            DemographicCategory::Experience => &["experience", "years of", "career", "senior", "junior", "veteran", "background"],
            DemographicCategory::Location => &["location", "based in", "lives in", "live in", "city", "town", "country", "region", "berlin", "london", "remote"],
            DemographicCategory::Income => &["income", "salary", "earn", "earns", "revenue", "budget", "eur", "usd", "k per"],
            DemographicCategory::Family => &["family", "married", "kids", "children", "partner", "single", "parent"],
            DemographicCategory::Technology => &["technology", "tech-savvy", "digital", "software", "computer", "smartphone", "online", "tools"],
        }
    }

    /// True when `text` (lowercased by the caller) mentions this category.
    pub fn mentioned_in(&self, lower_text: &str) -> bool {
        self.indicators().iter().any(|i| lower_text.contains(i))
    }
}

/// Default alignment when the description makes no specific demographic claim.
pub const NO_CLAIM_DEFAULT_ALIGNMENT: f32 = 0.8;

/// Category-specific alignment: categories evidenced / categories claimed.
pub fn demographic_alignment(description: &str, evidence_text: &str) -> f32 {
    let desc_lower = description.to_lowercase();
    let evidence_lower = evidence_text.to_lowercase();

    let claimed: Vec<DemographicCategory> = DemographicCategory::ALL
        .iter()
        .copied()
        .filter(|c| c.mentioned_in(&desc_lower))
        .collect();

    if claimed.is_empty() {
        return NO_CLAIM_DEFAULT_ALIGNMENT;
    }

    let evidenced = claimed
        .iter()
        .filter(|c| c.mentioned_in(&evidence_lower))
        .count();
    evidenced as f32 / claimed.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_claims_defaults() {
        let score = demographic_alignment("A motivated person", "I like coffee");
        assert!((score - NO_CLAIM_DEFAULT_ALIGNMENT).abs() < 1e-6);
    }

    #[test]
    fn test_claimed_and_evidenced() {
        let score = demographic_alignment(
            "Broker with 15 years of experience based in Berlin",
            "I have 15 years of experience as a broker and I am based in Berlin",
        );
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_claimed_but_unevidenced() {
        // Profession and experience claimed; evidence covers neither.
        let score = demographic_alignment(
            "Works as a manager with a long career",
            "I enjoy hiking on weekends",
        );
        assert!(score < 0.01);
    }

    #[test]
    fn test_partial_coverage() {
        // Claims profession + location; evidence only covers profession.
        let score = demographic_alignment(
            "A designer based in a big city",
            "I work as a designer most days",
        );
        assert!((score - 0.5).abs() < 1e-6);
    }
}
