//! Intermediate results passed between engine stages.

use mb_protocol::{PredictionMethod, RiskLevel};

/// Output of one scoring path (classifier, rule-based, or their blend).
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrediction {
    pub risk_level: RiskLevel,
    /// Continuous score in [0, 1].
    pub risk_score: f64,
    /// Self-reported reliability of this path.
    pub confidence: f64,
    pub method: PredictionMethod,
    /// Human-readable contributing factors (rule-based path only).
    pub risk_factors: Vec<String>,
}
