//! Error types for Potluck operations.

use potluck_access::AccessError;
use potluck_core::{UserId, ValidationError};
use potluck_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Potluck operations.
#[derive(Debug, Error)]
pub enum PotluckError {
    /// The caller may not perform the operation, or the target does not
    /// exist. The two are not distinguished.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An argument failed validation.
    #[error("invalid argument: {0}")]
    Invalid(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// An invariant broke, such as a recipe missing right after it was
    /// written.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`PotluckError`] for callers that map errors
/// onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Forbidden,
    Invalid,
    Internal,
}

impl PotluckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PotluckError::Forbidden(_) => ErrorKind::Forbidden,
            PotluckError::Invalid(_) => ErrorKind::Invalid,
            PotluckError::Store(_) | PotluckError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<AccessError> for PotluckError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Forbidden(reason) => PotluckError::Forbidden(reason),
            AccessError::Store(err) => PotluckError::Store(err),
        }
    }
}

/// Convert an access failure on a mutating path, logging denials.
pub(crate) fn denied(op: &'static str, user_id: &UserId, err: AccessError) -> PotluckError {
    if err.is_forbidden() {
        tracing::warn!(op, %user_id, reason = %err, "mutation denied");
    }
    err.into()
}

/// Result type for Potluck operations.
pub type Result<T> = std::result::Result<T, PotluckError>;
