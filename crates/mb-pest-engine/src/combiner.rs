//! Prediction combiner: reconciles the statistical and rule paths.
//!
//! 1. No statistical result: the rule result, unchanged.
//! 2. Statistical confidence above the override threshold: the statistical
//!    result, unchanged.
//! 3. Otherwise a blend tagged `combined`.

use mb_protocol::{PredictionMethod, RiskLevel};

use crate::types::PathPrediction;

pub const DEFAULT_ML_OVERRIDE_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionCombiner {
    override_confidence: f64,
}

impl Default for PredictionCombiner {
    fn default() -> Self {
        Self::new(DEFAULT_ML_OVERRIDE_CONFIDENCE)
    }
}

impl PredictionCombiner {
    pub fn new(override_confidence: f64) -> Self {
        Self {
            override_confidence,
        }
    }

    pub fn override_confidence(&self) -> f64 {
        self.override_confidence
    }

    pub fn combine(&self, ml: Option<PathPrediction>, rules: PathPrediction) -> PathPrediction {
        let Some(ml) = ml else {
            return rules;
        };
        if ml.confidence > self.override_confidence {
            return ml;
        }

        let level = blend_levels(ml.risk_level, rules.risk_level);
        tracing::debug!(
            ml = %ml.risk_level,
            rules = %rules.risk_level,
            blended = %level,
            "blending predictions"
        );
        PathPrediction {
            risk_level: level,
            risk_score: (ml.risk_score + rules.risk_score) / 2.0,
            confidence: (ml.confidence + rules.confidence) / 2.0,
            method: PredictionMethod::Combined,
            risk_factors: rules.risk_factors,
        }
    }
}

/// Mean of the ordinal indices, halves rounded toward the more severe level.
pub fn blend_levels(a: RiskLevel, b: RiskLevel) -> RiskLevel {
    let sum = (a.index() + b.index()) as i64;
    RiskLevel::from_index((sum + 1) / 2)
}
