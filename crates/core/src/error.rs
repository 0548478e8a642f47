//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or missing input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// The caller's role does not permit the operation.
    #[error("forbidden")]
    Forbidden,

    /// An unrecognized workflow action token.
    #[error("invalid action '{0}': use \"approve\" or \"reject\"")]
    InvalidAction(String),

    /// A ledger debit would overdraw the (bank, blood group) counter.
    ///
    /// Carries the quantities so the caller can self-correct (e.g. pick a
    /// different bank).
    #[error("insufficient blood units: available {available}, required {required}")]
    InsufficientUnits { available: u32, required: u32 },

    /// A state transition raced another writer or targeted a terminal status.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_action(token: impl Into<String>) -> Self {
        Self::InvalidAction(token.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
