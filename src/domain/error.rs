//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of structural invariants.
///
/// Data irregularities (missing ranks, ambiguous anchors) are never errors;
/// the builder absorbs them. Only broken invariants surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node '{node}' marked reducible has {degree} neighbours at collapse time")]
    NotReducible { node: String, degree: usize },

    #[error("invalid backbone: {0}")]
    InvalidBackbone(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
