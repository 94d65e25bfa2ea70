//! Macadamia farming advisor.
//!
//! Classifies grower questions, runs the pest-risk engine when a question
//! needs it, composes integrated pest management advice and keeps a short
//! conversation history.

pub mod advisor;
pub mod classifier;
pub mod error;
pub mod pest_advisor;

// Re-export key types for convenience
pub use advisor::{
    Advisor, HISTORY_LIMIT, INSUFFICIENT_FARM_DATA, MAX_QUERY_CHARS, fallback_reply,
    validate_query,
};
pub use classifier::QueryClassifier;
pub use error::{AdvisorError, AdvisorResult};
pub use pest_advisor::PestAdvisor;
