//! Error kinds for key loading, issuance, validation and refresh
//!
//! Every kind carries a stable `code()` so callers and the API boundary can
//! branch on the kind instead of on message text.

use thiserror::Error;

/// Key material could not be obtained
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("Key material missing: {message}")]
    Missing { message: String },

    #[error("Key material invalid: {message}")]
    Invalid { message: String },
}

impl KeyMaterialError {
    pub fn code(&self) -> &'static str {
        match self {
            KeyMaterialError::Missing { .. } => "KEY_MATERIAL_MISSING",
            KeyMaterialError::Invalid { .. } => "KEY_MATERIAL_INVALID",
        }
    }
}

/// Token issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("Subject id is required to issue a token")]
    InvalidSubject,

    #[error("Signing failure: {message}")]
    SigningFailure { message: String },
}

impl IssueError {
    pub fn code(&self) -> &'static str {
        match self {
            IssueError::InvalidSubject => "INVALID_SUBJECT",
            IssueError::SigningFailure { .. } => "SIGNING_FAILURE",
        }
    }
}

/// Reason a presented token was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationFailure {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,

    #[error("User not found")]
    SubjectNotFound,

    #[error("User account is disabled")]
    SubjectDisabled,
}

impl ValidationFailure {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::InvalidSignature => "INVALID_SIGNATURE",
            ValidationFailure::Expired => "TOKEN_EXPIRED",
            ValidationFailure::Malformed => "MALFORMED_TOKEN",
            ValidationFailure::SubjectNotFound => "SUBJECT_NOT_FOUND",
            ValidationFailure::SubjectDisabled => "SUBJECT_DISABLED",
        }
    }
}

/// Refresh exchange errors
///
/// `Network` and `Timeout` are transient and retried by the orchestrator;
/// once retries run out they surface wrapped in `Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Refresh request timed out")]
    Timeout,

    #[error("Refresh token rejected with status {status}")]
    Rejected { status: u16, body: String },

    #[error("Invalid refresh response: {message}")]
    InvalidResponse { message: String },

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("No client credentials configured")]
    MissingClientCredentials,

    #[error("Refresh failed after {attempts} attempts: {cause}")]
    Failed {
        attempts: u32,
        cause: Box<RefreshError>,
    },

    #[error("Refresh task aborted: {message}")]
    Aborted { message: String },
}

impl RefreshError {
    pub fn code(&self) -> &'static str {
        match self {
            RefreshError::Network { .. } => "NETWORK_ERROR",
            RefreshError::Timeout => "TIMEOUT",
            RefreshError::Rejected { .. } => "REFRESH_REJECTED",
            RefreshError::InvalidResponse { .. } => "INVALID_REFRESH_RESPONSE",
            RefreshError::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            RefreshError::MissingClientCredentials => "MISSING_CLIENT_CREDENTIALS",
            RefreshError::Failed { .. } => "REFRESH_FAILED",
            RefreshError::Aborted { .. } => "REFRESH_ABORTED",
        }
    }

    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, RefreshError::Network { .. } | RefreshError::Timeout)
    }

    /// Whether the caller has to obtain fresh credentials out of band
    pub fn requires_reauthentication(&self) -> bool {
        !matches!(self, RefreshError::Aborted { .. }) && !self.is_transient()
    }

    /// The innermost error, unwrapping `Failed`
    pub fn root_cause(&self) -> &RefreshError {
        match self {
            RefreshError::Failed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
