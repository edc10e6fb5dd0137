//! Token signing configuration

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped for local development only
pub const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// Which family of key material signs and verifies tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningModeKind {
    /// Shared secret (HMAC)
    #[default]
    Symmetric,
    /// RSA keypair loaded from PEM files
    Asymmetric,
}

impl std::str::FromStr for SigningModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symmetric" | "hmac" | "secret" => Ok(SigningModeKind::Symmetric),
            "asymmetric" | "rsa" | "keypair" => Ok(SigningModeKind::Asymmetric),
            _ => Err(format!("Invalid signing mode: {}", s)),
        }
    }
}

/// JWT issuance and verification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Signing mode selected at startup
    #[serde(default)]
    pub mode: SigningModeKind,

    /// Algorithm name (HS256 for symmetric, RS256 for asymmetric)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Shared secret for symmetric mode
    #[serde(default)]
    pub secret: String,

    /// PEM private key path for asymmetric signing
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// PEM public key path for asymmetric verification
    #[serde(default)]
    pub public_key_path: Option<String>,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_lifetime")]
    pub access_token_lifetime: u64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_lifetime")]
    pub refresh_token_lifetime: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            mode: SigningModeKind::Symmetric,
            algorithm: default_algorithm(),
            secret: String::from(DEVELOPMENT_SECRET),
            private_key_path: None,
            public_key_path: None,
            access_token_lifetime: default_access_lifetime(),
            refresh_token_lifetime: default_refresh_lifetime(),
        }
    }
}

impl JwtConfig {
    /// Create a symmetric configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create an asymmetric configuration from key file paths
    pub fn rsa(private_key_path: impl Into<String>, public_key_path: impl Into<String>) -> Self {
        Self {
            mode: SigningModeKind::Asymmetric,
            algorithm: String::from("RS256"),
            secret: String::new(),
            private_key_path: Some(private_key_path.into()),
            public_key_path: Some(public_key_path.into()),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mode: SigningModeKind = std::env::var("JWT_SIGNING_MODE")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default();
        let algorithm = std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| match mode {
            SigningModeKind::Symmetric => String::from("HS256"),
            SigningModeKind::Asymmetric => String::from("RS256"),
        });

        Self {
            mode,
            algorithm,
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH").ok(),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH").ok(),
            access_token_lifetime: std::env::var("JWT_ACCESS_TOKEN_LIFETIME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_lifetime),
            refresh_token_lifetime: std::env::var("JWT_REFRESH_TOKEN_LIFETIME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_lifetime),
        }
    }

    /// Set access token lifetime in minutes
    pub fn with_access_lifetime_minutes(mut self, minutes: u64) -> Self {
        self.access_token_lifetime = minutes * 60;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_lifetime_days(mut self, days: u64) -> Self {
        self.refresh_token_lifetime = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.mode == SigningModeKind::Symmetric && self.secret == DEVELOPMENT_SECRET
    }

    /// Check that the algorithm belongs to the selected mode
    pub fn validate(&self) -> Result<(), String> {
        let allowed: &[&str] = match self.mode {
            SigningModeKind::Symmetric => &["HS256", "HS384", "HS512"],
            SigningModeKind::Asymmetric => &["RS256", "RS384", "RS512"],
        };
        if !allowed.contains(&self.algorithm.as_str()) {
            return Err(format!(
                "Algorithm {} is not valid for {:?} signing",
                self.algorithm, self.mode
            ));
        }
        if self.mode == SigningModeKind::Asymmetric
            && self.private_key_path.is_none()
            && self.public_key_path.is_none()
        {
            return Err("Asymmetric signing requires at least one key path".to_string());
        }
        Ok(())
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_access_lifetime() -> u64 {
    3600 // 1 hour
}

fn default_refresh_lifetime() -> u64 {
    604800 // 7 days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_lifetime, 3600);
        assert_eq!(config.refresh_token_lifetime, 604800);
        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.mode, SigningModeKind::Symmetric);
        assert!(config.is_using_default_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_lifetime_minutes(30)
            .with_refresh_lifetime_days(14);

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_lifetime, 1800);
        assert_eq!(config.refresh_token_lifetime, 1209600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_rsa_config() {
        let config = JwtConfig::rsa("keys/private.pem", "keys/public.pem");
        assert_eq!(config.mode, SigningModeKind::Asymmetric);
        assert_eq!(config.algorithm, "RS256");
        assert!(!config.is_using_default_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_algorithm_mismatch_rejected() {
        let mut config = JwtConfig::new("secret");
        config.algorithm = String::from("RS256");
        assert!(config.validate().is_err());

        let mut config = JwtConfig::rsa("a.pem", "b.pem");
        config.algorithm = String::from("HS256");
        assert!(config.validate().is_err());

        let mut config = JwtConfig::rsa("a.pem", "b.pem");
        config.private_key_path = None;
        config.public_key_path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_signing_mode_from_str() {
        assert_eq!("RSA".parse::<SigningModeKind>().unwrap(), SigningModeKind::Asymmetric);
        assert_eq!("symmetric".parse::<SigningModeKind>().unwrap(), SigningModeKind::Symmetric);
        assert!("ecdsa".parse::<SigningModeKind>().is_err());
    }
}
