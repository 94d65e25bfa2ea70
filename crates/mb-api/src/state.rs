//! Shared application state for the Axum server.

use std::sync::Arc;

use mb_advisor::Advisor;
use mb_pest_engine::{EngineConfig, KnowledgeBase, PestRiskEngine};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after construction.
    pub engine: Arc<PestRiskEngine>,
    /// Holds the conversation history behind its own lock.
    pub advisor: Arc<Advisor>,
}

impl AppState {
    pub fn new(engine: PestRiskEngine) -> Self {
        let engine = Arc::new(engine);
        Self {
            advisor: Arc::new(Advisor::new(Arc::clone(&engine))),
            engine,
        }
    }

    /// Load model artifacts and knowledge base from the configured paths.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(PestRiskEngine::from_config(config))
    }

    /// Rule-based engine over the given knowledge base (tests and development).
    pub fn rule_based(knowledge: KnowledgeBase) -> Self {
        Self::new(PestRiskEngine::rule_based(knowledge))
    }
}
