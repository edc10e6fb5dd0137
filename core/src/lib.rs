//! # Banking API Core
//!
//! Core credential logic for the banking API.
//! This crate contains the token entities, key material loading, token
//! issuance and validation, the client-side refresh orchestrator, repository
//! interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    mask_token, Claims, Subject, TokenPair, TokenType, BEARER, DEFAULT_ACCESS_TOKEN_LIFETIME,
    DEFAULT_REFRESH_TOKEN_LIFETIME,
};
pub use errors::{
    AuthOutcome, DomainError, DomainResult, IssueError, KeyMaterialError, RefreshError, ValidationFailure,
};
pub use repositories::IdentityLookup;
pub use services::{
    Clock, Grant, KeyMaterialProvider, ManualClock, RefreshConfig, RefreshOrchestrator, RefreshResponse,
    RefreshState, RefreshTransport, SigningMode, SystemClock, TokenIssuer, TokenServiceConfig, TokenValidator,
    ValidationResult,
};
