//! Statistical predictor: wraps a trained [`RiskClassifier`].
//!
//! Only constructed when a classifier was loaded at start-up. A failure on a
//! live call is logged and reported as `None` for that call only.

use std::sync::Arc;

use mb_protocol::{PredictionMethod, RiskLevel};

use crate::artifacts::LabelEncoder;
use crate::classifier::{RiskClassifier, argmax};
use crate::encoder::FeatureVector;
use crate::error::{EngineError, EngineResult};
use crate::types::PathPrediction;

/// Level used when a class cannot be mapped to one of the five levels.
const UNMAPPED_LEVEL: RiskLevel = RiskLevel::Medium;

pub struct StatisticalPredictor {
    classifier: Arc<dyn RiskClassifier>,
    target_encoder: Option<LabelEncoder>,
}

impl StatisticalPredictor {
    pub fn new(classifier: Arc<dyn RiskClassifier>, target_encoder: Option<LabelEncoder>) -> Self {
        Self {
            classifier,
            target_encoder,
        }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Predict, or `None` if the classifier fails on this input.
    pub fn predict(&self, features: &FeatureVector) -> Option<PathPrediction> {
        match self.try_predict(features) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::error!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "ML prediction error"
                );
                None
            }
        }
    }

    fn try_predict(&self, features: &FeatureVector) -> EngineResult<PathPrediction> {
        let proba = self.classifier.predict_proba(features.as_slice())?;
        if let Some(bad) = proba
            .iter()
            .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(EngineError::Model(format!("invalid class probability {bad}")));
        }
        let class = argmax(&proba)
            .ok_or_else(|| EngineError::Model("empty probability distribution".into()))?;
        let confidence = proba[class];

        let risk_level = self.resolve_level(class);
        tracing::debug!(
            class,
            level = %risk_level,
            confidence,
            scaled = features.scaled,
            "ML prediction"
        );

        Ok(PathPrediction {
            risk_level,
            risk_score: confidence,
            confidence,
            method: PredictionMethod::MachineLearning,
            risk_factors: Vec::new(),
        })
    }

    /// Map a class index to a level.
    ///
    /// Preference order: the classifier's own labels, then the fitted target
    /// encoder, then the ordinal training order (0 = very_low … 4 = very_high).
    fn resolve_level(&self, class: usize) -> RiskLevel {
        let label = self
            .classifier
            .class_labels()
            .and_then(|labels| labels.get(class).map(String::as_str))
            .or_else(|| self.target_encoder.as_ref().and_then(|e| e.inverse(class)));

        match label {
            Some(label) => RiskLevel::from_label(label).unwrap_or_else(|| {
                tracing::warn!(label = %label, "unrecognised risk label from model");
                UNMAPPED_LEVEL
            }),
            None => RiskLevel::ALL.get(class).copied().unwrap_or(UNMAPPED_LEVEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClassifier;

    fn features() -> FeatureVector {
        FeatureVector {
            values: [6.2, 22.0, 65.0, 120.0, 0.0, 5.0],
            scaled: false,
        }
    }

    #[test]
    fn ordinal_mapping_without_labels() {
        let mock = Arc::new(MockClassifier::always(vec![0.05, 0.05, 0.1, 0.7, 0.1]));
        let p = StatisticalPredictor::new(mock, None)
            .predict(&features())
            .unwrap();
        assert_eq!(p.risk_level, RiskLevel::High);
        assert!((p.confidence - 0.7).abs() < f64::EPSILON);
        assert!((p.risk_score - 0.7).abs() < f64::EPSILON);
        assert_eq!(p.method, PredictionMethod::MachineLearning);
    }

    #[test]
    fn target_encoder_labels_used() {
        // Alphabetical label order, as a fitted encoder would store it
        let encoder = LabelEncoder::new(["high", "low", "medium", "very_high", "very_low"]);
        let mock = Arc::new(MockClassifier::always(vec![0.1, 0.1, 0.1, 0.1, 0.6]));
        let p = StatisticalPredictor::new(mock, Some(encoder))
            .predict(&features())
            .unwrap();
        assert_eq!(p.risk_level, RiskLevel::VeryLow);
    }

    #[test]
    fn native_labels_preferred_over_encoder() {
        let encoder = LabelEncoder::new(["very_low", "low", "medium", "high", "very_high"]);
        let mock = Arc::new(
            MockClassifier::always(vec![0.9, 0.1])
                .with_labels(["very_high", "very_low"]),
        );
        let p = StatisticalPredictor::new(mock, Some(encoder))
            .predict(&features())
            .unwrap();
        assert_eq!(p.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn unknown_label_maps_to_medium() {
        let mock = Arc::new(MockClassifier::always(vec![1.0]).with_labels(["catastrophic"]));
        let p = StatisticalPredictor::new(mock, None)
            .predict(&features())
            .unwrap();
        assert_eq!(p.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn out_of_range_class_maps_to_medium() {
        let mock = Arc::new(MockClassifier::always(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]));
        let p = StatisticalPredictor::new(mock, None)
            .predict(&features())
            .unwrap();
        assert_eq!(p.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn failure_is_none_and_not_sticky() {
        let mock = Arc::new(MockClassifier::always(vec![0.0, 1.0, 0.0, 0.0, 0.0]));
        mock.fail_next("corrupt tree");
        let predictor = StatisticalPredictor::new(mock.clone(), None);

        assert!(predictor.predict(&features()).is_none());
        let p = predictor.predict(&features()).unwrap();
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn invalid_probability_rejected() {
        for proba in [
            vec![f64::NAN, 0.5],
            vec![0.5, f64::NAN],
            vec![-0.5, 0.75, 0.75],
            vec![0.2, 1.5],
            vec![f64::INFINITY, 0.0],
        ] {
            let mock = Arc::new(MockClassifier::always(proba.clone()));
            assert!(
                StatisticalPredictor::new(mock, None).predict(&features()).is_none(),
                "accepted {proba:?}"
            );
        }
    }
}
