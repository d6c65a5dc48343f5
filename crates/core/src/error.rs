//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Everything else in the workflow (a failed reservation, a declined payment)
/// is an ordinary boolean outcome that ends in a terminal order status, not
/// an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required input was missing, empty, or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An order unfit for payment reached the payment processor.
    #[error("payment rejected: {0}")]
    Payment(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn payment(msg: impl Into<String>) -> Self {
        Self::Payment(msg.into())
    }
}
