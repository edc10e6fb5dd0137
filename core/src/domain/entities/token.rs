//! Token entities for JWT-based authentication.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default access token lifetime (1 hour)
pub const DEFAULT_ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Token scheme advertised in token pairs and `Authorization` headers
pub const BEARER: &str = "Bearer";

/// Kind of token carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenType::Access),
            "refresh" => Ok(TokenType::Refresh),
            other => Err(format!("Unknown token type: {}", other)),
        }
    }
}

/// Claims structure for JWT payload
///
/// Serialized with the claim names other services already verify:
/// `user_id`, `iat`, `exp` and `token_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier
    #[serde(rename = "user_id")]
    pub subject_id: String,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims issued at `now` that expire after `lifetime`
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Identifier of the principal the token is for
    /// * `token_type` - Access or refresh
    /// * `now` - Issuance instant
    /// * `lifetime` - Time until expiry; zero yields a token that is already expired
    pub fn new(
        subject_id: impl Into<String>,
        token_type: TokenType,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let iat = now.timestamp();
        let lifetime_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);

        Self {
            subject_id: subject_id.into(),
            iat,
            exp: iat.saturating_add(lifetime_secs),
            token_type,
        }
    }

    /// Issued-at as a timestamp
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Checks expiry against `now`. No leeway: a token is expired from the
    /// second its `exp` is reached.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn is_access(&self) -> bool {
        self.token_type == TokenType::Access
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,
}

impl TokenPair {
    /// Creates a new bearer token pair
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
        }
    }
}

/// Shortens a token for log output
pub fn mask_token(token: &str) -> String {
    if token.len() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{}...({} chars)", prefix, token.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_timestamps() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("42", TokenType::Access, now, DEFAULT_ACCESS_TOKEN_LIFETIME);

        assert_eq!(claims.subject_id, "42");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
        assert_eq!(claims.issued_at(), Some(now));
        assert!(claims.is_access());
        assert!(!claims.is_refresh());
    }

    #[test]
    fn test_claims_expiry_is_strict() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("42", TokenType::Refresh, now, Duration::from_secs(60));

        assert!(!claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now + chrono::Duration::seconds(59)));
        assert!(claims.is_expired_at(now + chrono::Duration::seconds(60)));
    }

    #[test]
    fn test_zero_lifetime_is_expired_immediately() {
        let now = Utc::now();
        let claims = Claims::new("42", TokenType::Access, now, Duration::ZERO);
        assert_eq!(claims.iat, claims.exp);
        assert!(claims.is_expired_at(now));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let claims = Claims::new("42", TokenType::Access, Utc::now(), Duration::from_secs(u64::MAX));
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_claims_wire_names() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("7", TokenType::Refresh, now, Duration::from_secs(10));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["user_id"], "7");
        assert_eq!(json["token_type"], "refresh");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_010);
    }

    #[test]
    fn test_token_pair_is_bearer() {
        let pair = TokenPair::new("a".to_string(), "r".to_string());
        assert_eq!(pair.token_type, "Bearer");

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGci...(28 chars)");
    }
}
