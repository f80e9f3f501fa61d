//! Error types for access checks.

use potluck_store::StoreError;
use thiserror::Error;

/// Errors that can occur during access checks.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The caller may not perform the operation. Also returned when the
    /// target does not exist, so callers cannot enumerate ids.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The check itself could not be evaluated.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AccessError {
    /// Whether this is a policy denial rather than an infrastructure failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AccessError::Forbidden(_))
    }
}

/// Result type for access checks.
pub type Result<T> = std::result::Result<T, AccessError>;
