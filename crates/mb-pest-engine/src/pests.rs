//! Pest-specific analyzer: per-pest risk flags from raw weather inputs.
//!
//! Independent of the combined score. Only pests whose rules trigger are
//! returned.

use std::collections::BTreeMap;

use mb_protocol::{FarmConditions, PestId, PestRisk, RiskLevel, Season};

use crate::knowledge::KnowledgeBase;

#[derive(Debug, Clone)]
pub struct PestAnalyzer {
    knowledge: KnowledgeBase,
}

impl PestAnalyzer {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    pub fn analyze(&self, farm: &FarmConditions) -> BTreeMap<PestId, PestRisk> {
        PestId::ALL
            .into_iter()
            .filter_map(|pest| {
                let level = triggered_level(pest, farm)?;
                Some((
                    pest,
                    PestRisk {
                        risk_level: level,
                        description: self.knowledge.description(pest).to_string(),
                        peak_activity: self.knowledge.timing(pest).to_string(),
                    },
                ))
            })
            .collect()
    }
}

/// Risk level for one pest, or `None` when its rules do not trigger.
pub fn triggered_level(pest: PestId, farm: &FarmConditions) -> Option<RiskLevel> {
    let growing_season = matches!(farm.season_kind(), Some(Season::Spring | Season::Summer));
    let (t, h, r) = (farm.temperature, farm.humidity, farm.rainfall);

    match pest {
        PestId::MacadamiaNutBorer => (t > 26.0 && h > 65.0).then(|| {
            if growing_season {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            }
        }),
        PestId::StinkBugs => (t > 22.0 && growing_season).then(|| {
            if h > 70.0 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            }
        }),
        PestId::ScaleInsects => (h > 75.0 || (t > 26.0 && r < 80.0)).then(|| {
            if h > 85.0 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            }
        }),
    }
}
