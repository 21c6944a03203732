//! Domain error type shared by repositories and services.

use thiserror::Error;

/// Failure of a domain operation.
///
/// Storage adapters translate their native errors into this type so that
/// services never see a driver error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DomainError::NotFound(what.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
