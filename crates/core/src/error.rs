//! Domain error model.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::Violations;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing records, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A conflict occurred (duplicate business key, stale version).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Not enough stock on hand to satisfy a withdrawal.
    #[error("Insufficient stock for beer {beer_id}. Requested: {requested}, Available: {available}")]
    InsufficientStock {
        beer_id: Uuid,
        requested: i32,
        available: i32,
    },
}

impl DomainError {
    /// Single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.push(field, message);
        Self::Validation(violations)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<Violations> for DomainError {
    fn from(value: Violations) -> Self {
        Self::Validation(value)
    }
}
