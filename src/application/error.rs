// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Failures of a use case. Domain rule violations pass through unchanged so
/// the HTTP layer can tell a dangling link target from a malformed request.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Bad input detected above the domain: paging, filters, bulk actions,
    /// a wrong current password.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, malformed, forged or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the token does not carry the capability.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Hashing, signing or runtime failures. Never shown to clients verbatim.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn missing_capability(resource: &str, action: &str) -> Self {
        Self::Forbidden(format!("missing capability {resource}:{action}"))
    }
}
