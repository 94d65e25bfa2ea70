//! Rule-based scorer: deterministic additive scoring over raw farm inputs.
//!
//! Always available and never fails. Each contribution appends a reason to
//! `risk_factors` in evaluation order.

use mb_protocol::{FarmConditions, PredictionMethod, RiskLevel, Season};

use crate::types::PathPrediction;

/// Confidence reported by the rule path (only used when blending).
pub const RULE_CONFIDENCE: f64 = 0.7;

/// Highest raw score the rules can produce.
pub const MAX_RAW_SCORE: u32 = 10;

/// Raw score plus the reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleScore {
    pub raw: u32,
    pub factors: Vec<String>,
}

/// Stateless scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleScorer;

impl RuleScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, farm: &FarmConditions) -> PathPrediction {
        let RuleScore { raw, factors } = raw_score(farm);
        PathPrediction {
            risk_level: level_for(raw),
            risk_score: normalise(raw),
            confidence: RULE_CONFIDENCE,
            method: PredictionMethod::RuleBased,
            risk_factors: factors,
        }
    }
}

/// Sum every rule's contribution.
pub fn raw_score(farm: &FarmConditions) -> RuleScore {
    let mut raw = 0;
    let mut factors = Vec::new();
    let mut add = |points: u32, reason: String| {
        raw += points;
        factors.push(reason);
    };

    // ── Temperature ─────────────────────────────────────────────
    if farm.temperature > 28.0 {
        add(2, "High temperature favors pest activity".into());
    } else if farm.temperature > 25.0 {
        add(1, "Moderate temperature increases pest risk".into());
    }

    // ── Humidity ────────────────────────────────────────────────
    if farm.humidity > 80.0 {
        add(2, "High humidity promotes pest development".into());
    } else if farm.humidity > 70.0 {
        add(1, "Elevated humidity increases pest pressure".into());
    }

    // ── Rainfall ────────────────────────────────────────────────
    if farm.rainfall < 50.0 {
        add(1, "Low rainfall may stress trees, increasing susceptibility".into());
    } else if farm.rainfall > 200.0 {
        add(2, "Excessive rainfall creates favorable pest conditions".into());
    }

    // ── Season ──────────────────────────────────────────────────
    match farm.season_kind() {
        Some(Season::Summer) => add(2, "Summer season peak pest activity period".into()),
        Some(season @ (Season::Spring | Season::Autumn)) => {
            add(1, format!("{} season moderate pest activity", capitalise(season.as_str())));
        }
        Some(Season::Winter) | None => {}
    }

    // ── Tree and soil ───────────────────────────────────────────
    if farm.tree_age < 3 {
        add(1, "Young trees more vulnerable to pests".into());
    }
    if farm.soil_ph < 5.5 || farm.soil_ph > 7.0 {
        add(1, "Suboptimal soil pH may weaken tree defenses".into());
    }

    RuleScore { raw, factors }
}

/// Thresholds: ≥8 very high, ≥6 high, ≥4 medium, ≥2 low.
pub fn level_for(raw: u32) -> RiskLevel {
    match raw {
        8.. => RiskLevel::VeryHigh,
        6..=7 => RiskLevel::High,
        4..=5 => RiskLevel::Medium,
        2..=3 => RiskLevel::Low,
        _ => RiskLevel::VeryLow,
    }
}

/// `raw / 10`, clamped to [0, 1].
pub fn normalise(raw: u32) -> f64 {
    (f64::from(raw) / f64::from(MAX_RAW_SCORE)).clamp(0.0, 1.0)
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(ph: f64, temp: f64, hum: f64, rain: f64, season: &str, age: u32) -> FarmConditions {
        FarmConditions::new(ph, temp, hum, rain, season, age)
    }

    #[test]
    fn calm_spring_scores_one() {
        let s = raw_score(&farm(6.2, 22.0, 65.0, 120.0, "spring", 5));
        assert_eq!(s.raw, 1);
        assert_eq!(s.factors, vec!["Spring season moderate pest activity"]);
        assert_eq!(level_for(s.raw), RiskLevel::VeryLow);
    }

    #[test]
    fn every_rule_firing_scores_ten() {
        let p = RuleScorer::new().score(&farm(5.0, 30.0, 85.0, 220.0, "summer", 1));
        assert_eq!(p.risk_level, RiskLevel::VeryHigh);
        assert_eq!(p.risk_score, 1.0);
        assert_eq!(p.method, PredictionMethod::RuleBased);
        assert_eq!(p.confidence, RULE_CONFIDENCE);
        assert_eq!(
            p.risk_factors,
            vec![
                "High temperature favors pest activity",
                "High humidity promotes pest development",
                "Excessive rainfall creates favorable pest conditions",
                "Summer season peak pest activity period",
                "Young trees more vulnerable to pests",
                "Suboptimal soil pH may weaken tree defenses",
            ]
        );
    }

    #[test]
    fn boundaries_are_strict() {
        // Exactly on every threshold: nothing fires
        let s = raw_score(&farm(5.5, 25.0, 70.0, 50.0, "winter", 3));
        assert_eq!(s.raw, 0);
        assert!(s.factors.is_empty());

        let s = raw_score(&farm(7.0, 28.0, 80.0, 200.0, "winter", 3));
        assert_eq!(s.raw, 2, "moderate temperature and elevated humidity only");
    }

    #[test]
    fn season_is_case_insensitive() {
        let upper = raw_score(&farm(6.2, 22.0, 65.0, 120.0, "SUMMER", 5));
        let lower = raw_score(&farm(6.2, 22.0, 65.0, 120.0, "summer", 5));
        assert_eq!(upper, lower);
        assert_eq!(upper.raw, 2);

        let autumn = raw_score(&farm(6.2, 22.0, 65.0, 120.0, "Autumn", 5));
        assert_eq!(autumn.factors, vec!["Autumn season moderate pest activity"]);
    }

    #[test]
    fn unknown_season_contributes_nothing() {
        let s = raw_score(&farm(6.2, 22.0, 65.0, 120.0, "monsoon", 5));
        assert_eq!(s.raw, 0);
    }

    #[test]
    fn thresholds() {
        let expected = [
            (0, RiskLevel::VeryLow),
            (1, RiskLevel::VeryLow),
            (2, RiskLevel::Low),
            (3, RiskLevel::Low),
            (4, RiskLevel::Medium),
            (5, RiskLevel::Medium),
            (6, RiskLevel::High),
            (7, RiskLevel::High),
            (8, RiskLevel::VeryHigh),
            (10, RiskLevel::VeryHigh),
        ];
        for (raw, level) in expected {
            assert_eq!(level_for(raw), level, "raw {raw}");
        }
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(normalise(0), 0.0);
        assert!((normalise(3) - 0.3).abs() < 1e-12);
        assert_eq!(normalise(12), 1.0);
    }

    #[test]
    fn monotone_in_temperature() {
        let scores: Vec<u32> = [20.0, 26.0, 29.0]
            .into_iter()
            .map(|t| raw_score(&farm(6.2, t, 65.0, 120.0, "winter", 5)).raw)
            .collect();
        assert_eq!(scores, vec![0, 1, 2]);
    }
}
