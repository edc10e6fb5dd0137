//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing mode, key material locations and lifetimes
//! - `environment` - Environment detection and logging configuration
//! - `refresh` - Outbound token refresh against a remote authority

pub mod auth;
pub mod environment;
pub mod refresh;

use serde::{Deserialize, Serialize};

pub use auth::{JwtConfig, SigningModeKind};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use refresh::RefreshClientConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Outbound refresh configuration
    #[serde(default)]
    pub refresh: RefreshClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            jwt: JwtConfig::from_env(),
            refresh: RefreshClientConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject configurations that cannot work at all
    pub fn validate(&self) -> Result<(), String> {
        self.jwt.validate()?;
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err("Default JWT secret must not be used in production".to_string());
        }
        Ok(())
    }
}
