//! Error types for Potluck core.

use thiserror::Error;

/// Errors decoding core values from their stored forms.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown access type: {0}")]
    UnknownAccessType(String),
}

/// Argument errors that reach the core despite upstream validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be between 1 and {max}, got {got}")]
    LimitOutOfRange {
        field: &'static str,
        got: u32,
        max: u32,
    },

    #[error("group id must not be empty")]
    EmptyGroupId,

    #[error("category must not be empty")]
    EmptyCategory,

    #[error("{kind} id {id} appears more than once")]
    DuplicateChildId { kind: &'static str, id: String },
}
