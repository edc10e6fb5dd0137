//! Domain-specific error types and error handling.

mod types;


pub use types::{IssueError, KeyMaterialError, RefreshError, ValidationFailure};

use thiserror::Error;

/// Core domain errors bridging every concern-specific kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// What the API boundary should do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Reject the request as unauthenticated
    Denied,
    /// Credentials are unusable; the principal must log in again
    Reauthenticate,
    /// Transient upstream trouble; the same call may succeed later
    RetryLater,
    /// Misconfiguration or local fault
    Internal,
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::KeyMaterial(e) => e.code(),
            DomainError::Issue(e) => e.code(),
            DomainError::Validation(e) => e.code(),
            DomainError::Refresh(e) => e.code(),
        }
    }

    pub fn outcome(&self) -> AuthOutcome {
        match self {
            DomainError::Configuration { .. } | DomainError::KeyMaterial(_) => AuthOutcome::Internal,
            DomainError::Issue(IssueError::InvalidSubject) => AuthOutcome::Denied,
            DomainError::Issue(IssueError::SigningFailure { .. }) => AuthOutcome::Internal,
            DomainError::Validation(ValidationFailure::SubjectDisabled) => AuthOutcome::Reauthenticate,
            DomainError::Validation(_) => AuthOutcome::Denied,
            DomainError::Refresh(RefreshError::Aborted { .. }) => AuthOutcome::Internal,
            DomainError::Refresh(e) if e.is_transient() => AuthOutcome::RetryLater,
            DomainError::Refresh(_) => AuthOutcome::Reauthenticate,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
