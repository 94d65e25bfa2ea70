//! Pest-risk engine: the single public entry point.
//!
//! Pipeline: encode → {statistical predictor, rule scorer} → combine →
//! per-pest analysis → recommendations and monitoring advice.
//!
//! [`PestRiskEngine::predict_pest_risk`] never fails. Any internal error is
//! logged and replaced by the fixed [`fallback_assessment`].

use std::path::PathBuf;

use chrono::Utc;
use mb_protocol::{FarmConditions, PredictionMethod, RiskAssessment, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::advice::AdviceGenerator;
use crate::artifacts::ModelArtifacts;
use crate::combiner::{DEFAULT_ML_OVERRIDE_CONFIDENCE, PredictionCombiner};
use crate::encoder::{FEATURE_COUNT, FeatureEncoder};
use crate::error::{EngineError, EngineResult};
use crate::knowledge::KnowledgeBase;
use crate::pests::PestAnalyzer;
use crate::predictor::StatisticalPredictor;
use crate::rules::RuleScorer;

/// Engine settings, usually the `[engine]` table of the service config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding `pest_risk_model.json`, `encoders.json`, `scalers.json`.
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    #[serde(default = "default_knowledge_base_path")]
    pub knowledge_base_path: PathBuf,

    /// Classifier confidence above which its result is used unblended.
    #[serde(default = "default_ml_override_confidence")]
    pub ml_override_confidence: f64,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_knowledge_base_path() -> PathBuf {
    PathBuf::from("data/pest_management.json")
}

fn default_ml_override_confidence() -> f64 {
    DEFAULT_ML_OVERRIDE_CONFIDENCE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            knowledge_base_path: default_knowledge_base_path(),
            ml_override_confidence: default_ml_override_confidence(),
        }
    }
}

/// Note attached to the degraded result.
pub const FALLBACK_NOTE: &str = "Fallback prediction - limited model availability";

/// Fixed result returned when the pipeline fails.
pub fn fallback_assessment() -> RiskAssessment {
    RiskAssessment {
        overall_risk_level: RiskLevel::Medium,
        risk_score: 0.5,
        confidence: Some(0.3),
        method: PredictionMethod::Fallback,
        risk_factors: Vec::new(),
        specific_pests: Default::default(),
        recommendations: vec![
            "Regular monitoring recommended".into(),
            "Maintain good orchard sanitation".into(),
            "Consult local agricultural extension".into(),
        ],
        monitoring_advice: vec![
            "Weekly visual inspections".into(),
            "Check for common pest signs".into(),
            "Monitor weather conditions".into(),
        ],
        prediction_date: Utc::now(),
        note: Some(FALLBACK_NOTE.into()),
    }
}

/// Read-only after construction; share it behind an `Arc`.
pub struct PestRiskEngine {
    encoder: FeatureEncoder,
    predictor: Option<StatisticalPredictor>,
    scorer: RuleScorer,
    combiner: PredictionCombiner,
    analyzer: PestAnalyzer,
    advice: AdviceGenerator,
    knowledge: KnowledgeBase,
}

impl PestRiskEngine {
    /// Build from loaded artifacts and a knowledge base handle.
    pub fn new(artifacts: ModelArtifacts, knowledge: KnowledgeBase) -> Self {
        let ModelArtifacts {
            classifier,
            season_encoder,
            target_encoder,
            scaler,
        } = artifacts;

        // A model trained on a different feature layout could never predict.
        let classifier = classifier.filter(|c| {
            let width = c.n_features();
            if width != FEATURE_COUNT {
                tracing::warn!(
                    classifier = c.name(),
                    expected = FEATURE_COUNT,
                    actual = width,
                    "model feature count mismatch, ignoring trained model"
                );
            }
            width == FEATURE_COUNT
        });
        let predictor = classifier.map(|c| StatisticalPredictor::new(c, target_encoder));
        match &predictor {
            Some(p) => tracing::info!(classifier = p.classifier_name(), "statistical predictor enabled"),
            None => tracing::info!("no trained model, using rule-based predictions only"),
        }

        Self {
            encoder: FeatureEncoder::new(season_encoder, scaler),
            predictor,
            scorer: RuleScorer::new(),
            combiner: PredictionCombiner::default(),
            analyzer: PestAnalyzer::new(knowledge.clone()),
            advice: AdviceGenerator::new(knowledge.clone()),
            knowledge,
        }
    }

    /// Engine without a trained model.
    pub fn rule_based(knowledge: KnowledgeBase) -> Self {
        Self::new(ModelArtifacts::none(), knowledge)
    }

    /// Load artifacts and knowledge base from the configured paths. Never fails.
    pub fn from_config(config: &EngineConfig) -> Self {
        let artifacts = ModelArtifacts::load(&config.model_dir);
        let knowledge = KnowledgeBase::load_or_empty(&config.knowledge_base_path);
        Self::new(artifacts, knowledge).with_override_confidence(config.ml_override_confidence)
    }

    /// Non-finite thresholds keep the default; others are clamped to `[0, 1]`.
    pub fn with_override_confidence(mut self, threshold: f64) -> Self {
        let threshold = if !threshold.is_finite() {
            tracing::warn!(value = threshold, "invalid ml_override_confidence, using default");
            DEFAULT_ML_OVERRIDE_CONFIDENCE
        } else if !(0.0..=1.0).contains(&threshold) {
            let clamped = threshold.clamp(0.0, 1.0);
            tracing::warn!(value = threshold, clamped, "ml_override_confidence outside [0, 1], clamping");
            clamped
        } else {
            threshold
        };
        self.combiner = PredictionCombiner::new(threshold);
        self
    }

    pub fn has_model(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn override_confidence(&self) -> f64 {
        self.combiner.override_confidence()
    }

    /// Assess pest risk for one set of farm conditions.
    pub fn predict_pest_risk(
        &self,
        soil_ph: f64,
        temperature: f64,
        humidity: f64,
        rainfall: f64,
        season: &str,
        tree_age: u32,
    ) -> RiskAssessment {
        self.assess(&FarmConditions::new(
            soil_ph,
            temperature,
            humidity,
            rainfall,
            season,
            tree_age,
        ))
    }

    /// Same as [`predict_pest_risk`](Self::predict_pest_risk), from a struct.
    pub fn assess(&self, farm: &FarmConditions) -> RiskAssessment {
        match self.try_assess(farm) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::warn!(error = %e, "pest risk prediction failed, returning fallback");
                fallback_assessment()
            }
        }
    }

    /// The pipeline with errors exposed.
    pub fn try_assess(&self, farm: &FarmConditions) -> EngineResult<RiskAssessment> {
        let bad = farm.non_finite_fields();
        if !bad.is_empty() {
            return Err(EngineError::NonFinite(bad.join(", ")));
        }

        let features = self.encoder.encode(farm);
        let ml = self.predictor.as_ref().and_then(|p| p.predict(&features));
        let rules = self.scorer.score(farm);
        let risk_factors = rules.risk_factors.clone();
        let combined = self.combiner.combine(ml, rules);

        if !combined.risk_score.is_finite() || !combined.confidence.is_finite() {
            return Err(EngineError::Other(format!(
                "non-finite result: score {}, confidence {}",
                combined.risk_score, combined.confidence
            )));
        }

        let specific_pests = self.analyzer.analyze(farm);
        let recommendations = self.advice.recommendations(combined.risk_level, &specific_pests);
        let monitoring_advice = self.advice.monitoring(combined.risk_level, &farm.season);

        tracing::debug!(
            level = %combined.risk_level,
            score = combined.risk_score,
            method = ?combined.method,
            pests = specific_pests.len(),
            "pest risk assessed"
        );

        let confidence = match combined.method {
            PredictionMethod::RuleBased => None,
            _ => Some(combined.confidence),
        };

        Ok(RiskAssessment {
            overall_risk_level: combined.risk_level,
            risk_score: combined.risk_score,
            confidence,
            method: combined.method,
            risk_factors,
            specific_pests,
            recommendations,
            monitoring_advice,
            prediction_date: Utc::now(),
            note: None,
        })
    }
}
