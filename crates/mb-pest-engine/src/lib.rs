//! Pest-risk decision engine for macadamia orchards.
//!
//! Encodes six farm inputs, scores them with a trained random forest when
//! one is available and with deterministic rules always, reconciles the two,
//! then adds per-pest flags, recommendations and monitoring advice drawn from
//! a static knowledge base.

pub mod advice;
pub mod artifacts;
pub mod classifier;
pub mod combiner;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod mock;
pub mod pests;
pub mod predictor;
pub mod rules;
pub mod types;

// Re-export key types for convenience
pub use artifacts::{LabelEncoder, ModelArtifacts, StandardScaler};
pub use classifier::{DecisionTree, ForestClassifier, RiskClassifier};
pub use combiner::{DEFAULT_ML_OVERRIDE_CONFIDENCE, PredictionCombiner};
pub use encoder::{FeatureEncoder, FeatureVector};
pub use engine::{EngineConfig, FALLBACK_NOTE, PestRiskEngine, fallback_assessment};
pub use error::{EngineError, EngineResult};
pub use knowledge::{KnowledgeBase, PestKnowledgeEntry};
pub use mock::{MockClassifier, MockOutcome};
pub use types::PathPrediction;
