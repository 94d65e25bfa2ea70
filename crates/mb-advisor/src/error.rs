//! Advisor error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("query too long: {len} characters (max {max})")]
    QueryTooLong { len: usize, max: usize },
}

/// Convenience alias for advisor results.
pub type AdvisorResult<T> = Result<T, AdvisorError>;
