//! Transport seam between the orchestrator and the remote token authority

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::RefreshError;

/// Body returned by a successful exchange
///
/// Accepts both the short field names and the OAuth-style
/// `access_token`/`refresh_token` names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token
    #[serde(default, alias = "access_token")]
    pub access: String,
    /// Rotated refresh token, when the authority issues one
    #[serde(default, alias = "refresh_token", skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

/// Remote token authority
///
/// Implementations perform exactly one request per call; retry and timeout
/// policy belong to the orchestrator.
#[async_trait]
pub trait RefreshTransport: Send + Sync {
    /// Exchange a refresh token for a new access token
    ///
    /// # Returns
    /// * `Ok(RefreshResponse)` - 2xx with a parsable body
    /// * `Err(RefreshError::Rejected)` - 4xx from the authority
    /// * `Err(RefreshError::Network)` - Connection failure or 5xx
    /// * `Err(RefreshError::Timeout)` - The request timed out
    /// * `Err(RefreshError::InvalidResponse)` - 2xx with an unusable body
    async fn exchange(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError>;

    /// Obtain a new pair with the client-credentials grant
    ///
    /// Status handling matches [`Self::exchange`].
    /// `Err(RefreshError::MissingClientCredentials)` when the transport was
    /// built without client credentials.
    async fn acquire(&self) -> Result<RefreshResponse, RefreshError>;

    /// Ask the authority whether a token is valid
    ///
    /// Returns the decoded payload on success and `None` for any non-success status.
    async fn verify(&self, token: &str) -> Result<Option<serde_json::Value>, RefreshError>;
}
