use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::farm::Season;

/// Farming domain a query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Planting,
    PestManagement,
    Fertilization,
    Harvesting,
    Certification,
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Planting => "planting",
            Domain::PestManagement => "pest_management",
            Domain::Fertilization => "fertilization",
            Domain::Harvesting => "harvesting",
            Domain::Certification => "certification",
            Domain::General => "general",
        }
    }
}

/// What the user is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PredictionRequest,
    AdviceRequest,
    InformationRequest,
    ProblemSolving,
    ComparisonRequest,
    GeneralInquiry,
}

impl Intent {
    /// Intents clear enough to raise classification confidence.
    pub fn is_clear(&self) -> bool {
        matches!(
            self,
            Intent::PredictionRequest | Intent::AdviceRequest | Intent::InformationRequest
        )
    }
}

/// A model-backed prediction the query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionNeed {
    PestRisk,
    FertilizerNeed,
    HarvestTiming,
    YieldPrediction,
}

/// Primary way the response is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMethod {
    Conversational,
    MlPrediction,
    Hybrid,
    KnowledgeBase,
}

/// How the advisor should assemble its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStrategy {
    pub primary_method: ResponseMethod,
    pub use_ml_predictions: bool,
    pub use_knowledge_base: bool,
    pub prediction_types: Vec<PredictionNeed>,
    pub requires_farm_data: bool,
}

impl Default for ResponseStrategy {
    fn default() -> Self {
        Self {
            primary_method: ResponseMethod::Conversational,
            use_ml_predictions: false,
            use_knowledge_base: true,
            prediction_types: Vec::new(),
            requires_farm_data: false,
        }
    }
}

/// Values pulled out of the query text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub numbers: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_age: Option<u32>,
    /// "young", "mature" or "old" when no explicit age is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_age_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default)]
    pub urgent: bool,
}

/// Full classification of a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryClassification {
    pub domain: Domain,
    pub intent: Intent,
    pub prediction_needs: Vec<PredictionNeed>,
    pub response_strategy: ResponseStrategy,
    pub parameters: QueryParameters,
    /// Heuristic confidence in [0.3, 1.0].
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}
