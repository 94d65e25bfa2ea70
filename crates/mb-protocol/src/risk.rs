use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordinal pest-outbreak likelihood. Variant order is severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// All levels, least to most severe. Position equals [`RiskLevel::index`].
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Ordinal index, 0 = very_low … 4 = very_high.
    pub fn index(&self) -> usize {
        match self {
            RiskLevel::VeryLow => 0,
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::VeryHigh => 4,
        }
    }

    /// Level for an ordinal index; out-of-range indices clamp to the nearest end.
    pub fn from_index(index: i64) -> Self {
        let clamped = index.clamp(0, (Self::ALL.len() - 1) as i64);
        Self::ALL[clamped as usize]
    }

    /// Parse a snake_case label ("very_low", "High", "very high").
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "very_low" => Some(RiskLevel::VeryLow),
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "very_high" => Some(RiskLevel::VeryHigh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    /// Title-cased label for prose ("Very High").
    pub fn title(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    /// True for `high` and `very_high`.
    pub fn is_elevated(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scoring path produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Deterministic threshold scoring only.
    RuleBased,
    /// Trained classifier, trusted outright.
    MachineLearning,
    /// Blend of classifier and rule-based scores.
    Combined,
    /// Fixed degraded result after an internal failure.
    Fallback,
}

/// The pests the analyzer knows about. Keys match the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PestId {
    MacadamiaNutBorer,
    StinkBugs,
    ScaleInsects,
}

impl PestId {
    pub const ALL: [PestId; 3] = [
        PestId::MacadamiaNutBorer,
        PestId::StinkBugs,
        PestId::ScaleInsects,
    ];

    /// Knowledge-base key.
    pub fn key(&self) -> &'static str {
        match self {
            PestId::MacadamiaNutBorer => "macadamia_nut_borer",
            PestId::StinkBugs => "stink_bugs",
            PestId::ScaleInsects => "scale_insects",
        }
    }

    /// Human-readable name ("macadamia nut borer").
    pub fn display_name(&self) -> &'static str {
        match self {
            PestId::MacadamiaNutBorer => "macadamia nut borer",
            PestId::StinkBugs => "stink bugs",
            PestId::ScaleInsects => "scale insects",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for PestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Risk annotation for a single triggered pest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestRisk {
    pub risk_level: RiskLevel,
    /// Knowledge-base description (empty when unavailable).
    pub description: String,
    /// When the pest is most active (empty when unavailable).
    pub peak_activity: String,
}

/// Result of a pest-risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_level: RiskLevel,
    /// Continuous risk estimate in [0, 1].
    pub risk_score: f64,
    /// Absent for rule-based results; callers then rely on `risk_score`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub method: PredictionMethod,
    /// Reasons contributed by the rule-based scorer, in evaluation order.
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// Only pests whose rules fired are present.
    #[serde(default)]
    pub specific_pests: BTreeMap<PestId, PestRisk>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub monitoring_advice: Vec<String>,
    pub prediction_date: DateTime<Utc>,
    /// Set only when the assessment is a degraded fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RiskAssessment {
    pub fn is_fallback(&self) -> bool {
        self.method == PredictionMethod::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        for pair in RiskLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (i, level) in RiskLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn from_index_clamps() {
        assert_eq!(RiskLevel::from_index(-3), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_index(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_index(99), RiskLevel::VeryHigh);
    }

    #[test]
    fn from_label_accepts_variants() {
        assert_eq!(RiskLevel::from_label("very_high"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::from_label("Very High"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::from_label("LOW"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_label("extreme"), None);
    }

    #[test]
    fn level_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryHigh).unwrap(),
            r#""very_high""#
        );
        assert_eq!(
            serde_json::to_string(&PredictionMethod::MachineLearning).unwrap(),
            r#""machine_learning""#
        );
    }

    #[test]
    fn pest_keys_roundtrip() {
        for pest in PestId::ALL {
            assert_eq!(PestId::from_key(pest.key()), Some(pest));
        }
        assert_eq!(PestId::from_key("aphids"), None);
        assert_eq!(PestId::StinkBugs.display_name(), "stink bugs");
    }

    #[test]
    fn assessment_skips_absent_confidence_and_note() {
        let assessment = RiskAssessment {
            overall_risk_level: RiskLevel::Low,
            risk_score: 0.2,
            confidence: None,
            method: PredictionMethod::RuleBased,
            risk_factors: vec![],
            specific_pests: BTreeMap::new(),
            recommendations: vec![],
            monitoring_advice: vec![],
            prediction_date: Utc::now(),
            note: None,
        };
        let json = serde_json::to_string(&assessment).unwrap();
        assert!(!json.contains("confidence"));
        assert!(!json.contains("note"));
        assert!(json.contains(r#""method":"rule_based""#));
    }

    #[test]
    fn specific_pests_keyed_by_snake_case() {
        let mut pests = BTreeMap::new();
        pests.insert(
            PestId::ScaleInsects,
            PestRisk {
                risk_level: RiskLevel::Medium,
                description: String::new(),
                peak_activity: String::new(),
            },
        );
        let json = serde_json::to_value(&pests).unwrap();
        assert_eq!(json["scale_insects"]["risk_level"], "medium");
    }
}
