//! Access and refresh token issuance

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::entities::{Claims, TokenPair, TokenType};
use crate::errors::IssueError;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::key_manager::KeyMaterialProvider;

/// Mints signed tokens for a subject.
///
/// Issuance is local and deterministic, so nothing here is retried.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: KeyMaterialProvider,
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(keys: KeyMaterialProvider, config: TokenServiceConfig) -> Self {
        Self {
            keys,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issues an access token
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Identifier of the principal
    /// * `lifetime` - Overrides the configured access lifetime
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed JWT
    /// * `Err(IssueError::InvalidSubject)` - `subject_id` is empty
    /// * `Err(IssueError::SigningFailure)` - Key material cannot sign
    pub fn issue_access(&self, subject_id: &str, lifetime: Option<Duration>) -> Result<String, IssueError> {
        let lifetime = lifetime.unwrap_or(self.config.access_token_lifetime);
        self.issue(subject_id, TokenType::Access, lifetime)
    }

    /// Issues a refresh token; see [`Self::issue_access`]
    pub fn issue_refresh(&self, subject_id: &str, lifetime: Option<Duration>) -> Result<String, IssueError> {
        let lifetime = lifetime.unwrap_or(self.config.refresh_token_lifetime);
        self.issue(subject_id, TokenType::Refresh, lifetime)
    }

    /// Issues an access/refresh pair with the configured lifetimes
    pub fn issue_pair(&self, subject_id: &str) -> Result<TokenPair, IssueError> {
        let access_token = self.issue_access(subject_id, None)?;
        let refresh_token = self.issue_refresh(subject_id, None)?;
        Ok(TokenPair::new(access_token, refresh_token))
    }

    fn issue(&self, subject_id: &str, token_type: TokenType, lifetime: Duration) -> Result<String, IssueError> {
        if subject_id.trim().is_empty() {
            return Err(IssueError::InvalidSubject);
        }

        let claims = Claims::new(subject_id, token_type, self.clock.now(), lifetime);
        let token = self.keys.mode().sign(&claims)?;

        debug!(
            subject_id = %subject_id,
            token_type = %token_type,
            exp = claims.exp,
            "Issued token"
        );
        Ok(token)
    }
}
