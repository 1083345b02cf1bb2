//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The editor, generator and reconciler are total functions and never produce
/// one of these. Errors only originate at the explicit boundaries around them:
/// bounded generation, per-variant field edits and configuration parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// The attribute set would expand to more combinations than allowed.
    ///
    /// `count` is `None` when the product does not even fit in a `u128`.
    #[error("combination limit exceeded: {} combinations, limit {limit}", display_count(.count))]
    CombinationLimit { count: Option<u128>, limit: usize },
}

fn display_count(count: &Option<u128>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "overflowing".to_string(),
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn combination_limit(count: Option<u128>, limit: usize) -> Self {
        Self::CombinationLimit { count, limit }
    }
}
