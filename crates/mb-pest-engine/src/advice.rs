//! Recommendation and monitoring advice for an assessed risk level.

use std::collections::BTreeMap;

use mb_protocol::{PestId, PestRisk, RiskLevel, Season};

use crate::knowledge::KnowledgeBase;

const HIGH_TIER: &[&str] = &[
    "Increase monitoring frequency to twice weekly",
    "Consider preventive organic treatments",
    "Check pheromone traps daily",
    "Inspect trees for early pest signs",
];

const MEDIUM_TIER: &[&str] = &[
    "Maintain weekly monitoring schedule",
    "Prepare organic treatment materials",
    "Monitor beneficial insect populations",
];

const LOW_TIER: &[&str] = &[
    "Continue regular monitoring",
    "Maintain orchard sanitation",
    "Support beneficial insect habitat",
];

const MONITORING_BASELINE: &[&str] = &[
    "Visual inspection of leaves and branches",
    "Check for pest damage signs",
    "Monitor beneficial insect populations",
];

const MONITORING_HIGH_RISK: &[&str] = &[
    "Daily inspection of high-risk areas",
    "Document pest populations and damage",
    "Check pheromone trap catches",
];

fn seasonal_monitoring(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &["Monitor for emerging pest populations", "Check flowering trees carefully"],
        Season::Summer => &["Intensive monitoring during peak pest season", "Focus on developing nuts"],
        Season::Autumn => &["Monitor harvest areas", "Check for late-season pest buildup"],
        Season::Winter => &["Reduced monitoring frequency", "Focus on orchard sanitation"],
    }
}

#[derive(Debug, Clone)]
pub struct AdviceGenerator {
    knowledge: KnowledgeBase,
}

impl AdviceGenerator {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Tier baseline, then one line per triggered pest that has a treatment.
    pub fn recommendations(&self, level: RiskLevel, pests: &BTreeMap<PestId, PestRisk>) -> Vec<String> {
        let baseline = match level {
            RiskLevel::High | RiskLevel::VeryHigh => HIGH_TIER,
            RiskLevel::Medium => MEDIUM_TIER,
            RiskLevel::Low | RiskLevel::VeryLow => LOW_TIER,
        };
        let mut out: Vec<String> = baseline.iter().map(|s| s.to_string()).collect();

        for pest in pests.keys() {
            if let Some(treatment) = self.knowledge.first_treatment(*pest) {
                out.push(format!("For {}: {treatment}", pest.display_name()));
            }
        }
        out
    }

    /// Baseline, high-tier additions, then the season's additions.
    ///
    /// Unrecognised seasons get no seasonal lines.
    pub fn monitoring(&self, level: RiskLevel, season: &str) -> Vec<String> {
        let mut out: Vec<String> = MONITORING_BASELINE.iter().map(|s| s.to_string()).collect();
        if level.is_elevated() {
            out.extend(MONITORING_HIGH_RISK.iter().map(|s| s.to_string()));
        }
        if let Ok(season) = season.parse::<Season>() {
            out.extend(seasonal_monitoring(season).iter().map(|s| s.to_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::PestKnowledgeEntry;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_entries([
            (
                PestId::StinkBugs,
                PestKnowledgeEntry {
                    organic_treatments: vec!["Kaolin clay".into(), "Pyrethrin".into()],
                    ..Default::default()
                },
            ),
            (PestId::ScaleInsects, PestKnowledgeEntry::default()),
        ])
    }

    fn triggered(pests: &[PestId]) -> BTreeMap<PestId, PestRisk> {
        pests
            .iter()
            .map(|p| {
                (
                    *p,
                    PestRisk {
                        risk_level: RiskLevel::Medium,
                        description: String::new(),
                        peak_activity: String::new(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn tiers() {
        let advice = AdviceGenerator::new(KnowledgeBase::empty());
        let none = BTreeMap::new();
        assert_eq!(advice.recommendations(RiskLevel::VeryHigh, &none), HIGH_TIER);
        assert_eq!(advice.recommendations(RiskLevel::High, &none), HIGH_TIER);
        assert_eq!(advice.recommendations(RiskLevel::Medium, &none), MEDIUM_TIER);
        assert_eq!(advice.recommendations(RiskLevel::Low, &none), LOW_TIER);
        assert_eq!(advice.recommendations(RiskLevel::VeryLow, &none), LOW_TIER);
    }

    #[test]
    fn pest_line_uses_first_treatment() {
        let advice = AdviceGenerator::new(kb());
        let recs = advice.recommendations(
            RiskLevel::Medium,
            &triggered(&[PestId::StinkBugs, PestId::ScaleInsects, PestId::MacadamiaNutBorer]),
        );
        assert_eq!(recs.len(), MEDIUM_TIER.len() + 1);
        assert_eq!(recs.last().unwrap(), "For stink bugs: Kaolin clay");
    }

    #[test]
    fn monitoring_layers() {
        let advice = AdviceGenerator::new(KnowledgeBase::empty());

        let low = advice.monitoring(RiskLevel::Low, "Winter");
        assert_eq!(low.len(), 5);
        assert_eq!(low[3], "Reduced monitoring frequency");

        let high = advice.monitoring(RiskLevel::High, "summer");
        assert_eq!(high.len(), 8);
        assert_eq!(high[3], "Daily inspection of high-risk areas");
        assert_eq!(high[7], "Focus on developing nuts");

        let unknown = advice.monitoring(RiskLevel::VeryLow, "wet");
        assert_eq!(unknown, MONITORING_BASELINE);
    }
}
