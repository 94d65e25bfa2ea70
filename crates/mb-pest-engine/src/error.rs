//! Pest engine error types.

use thiserror::Error;

/// Errors raised inside the engine. None of these cross
/// [`PestRiskEngine::predict_pest_risk`](crate::PestRiskEngine::predict_pest_risk).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("malformed artifact {path}: {message}")]
    Parse { path: String, message: String },

    #[error("feature count mismatch: expected {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("unseen label: {0}")]
    UnseenLabel(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("invalid input: non-finite {0}")]
    NonFinite(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
