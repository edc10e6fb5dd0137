//! Configuration for token issuance

use std::time::Duration;

use ba_shared::config::JwtConfig;

use crate::domain::entities::{DEFAULT_ACCESS_TOKEN_LIFETIME, DEFAULT_REFRESH_TOKEN_LIFETIME};

/// Default lifetimes applied when the caller does not pass one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenServiceConfig {
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: DEFAULT_ACCESS_TOKEN_LIFETIME,
            refresh_token_lifetime: DEFAULT_REFRESH_TOKEN_LIFETIME,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            access_token_lifetime: Duration::from_secs(config.access_token_lifetime),
            refresh_token_lifetime: Duration::from_secs(config.refresh_token_lifetime),
        }
    }
}
