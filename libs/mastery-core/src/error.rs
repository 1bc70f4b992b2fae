//! Error types for mastery-core.

use thiserror::Error;

/// Result type alias using InputError.
pub type Result<T> = std::result::Result<T, InputError>;

/// Caller input rejected before it reaches the scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown practice mode: {0}")]
    UnknownMode(String),

    #[error("count must be non-negative, got {0}")]
    NegativeCount(i64),

    #[error("exam days remaining must be non-negative, got {0}")]
    NegativeExamDays(i64),

    #[error("daily reset hour must be between 0 and 23, got {0}")]
    InvalidResetHour(i64),
}
