//! # Infrastructure Layer
//!
//! This crate wires the banking API credential core to the outside world.
//! It provides the HTTP client for the remote token authority and assembles
//! the token services from configuration.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **HTTP**: `reqwest` implementation of the refresh transport
//! - **Bootstrap**: `.env` loading, logging setup and service construction

use std::sync::Arc;

use ba_core::errors::KeyMaterialError;
use ba_core::repositories::IdentityLookup;
use ba_core::services::refresh::RefreshOrchestrator;
use ba_core::services::token::{KeyMaterialProvider, TokenIssuer, TokenServiceConfig, TokenValidator};
use ba_shared::config::{AppConfig, Environment};

/// HTTP clients for external services
pub mod http;

pub use http::HttpRefreshTransport;

/// Credential services built from one configuration
#[derive(Debug, Clone)]
pub struct InfrastructureServices {
    pub config: AppConfig,
    pub keys: KeyMaterialProvider,
    pub issuer: TokenIssuer,
    pub refresh: RefreshOrchestrator,
}

impl InfrastructureServices {
    /// Assembles the services; no network access happens here
    pub fn build(config: AppConfig) -> Result<Self, InfrastructureError> {
        let keys = KeyMaterialProvider::load(&config.jwt)?;
        let issuer = TokenIssuer::new(keys.clone(), TokenServiceConfig::from(&config.jwt));

        let transport = Arc::new(HttpRefreshTransport::from_config(&config.refresh)?);
        let refresh = RefreshOrchestrator::from_config(transport, &config.refresh);

        Ok(Self {
            config,
            keys,
            issuer,
            refresh,
        })
    }

    /// A validator over the loaded keys backed by `lookup`
    pub fn validator<L: IdentityLookup>(&self, lookup: L) -> Result<TokenValidator<L>, InfrastructureError> {
        Ok(TokenValidator::new(self.keys.clone(), lookup)?)
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - Configuration from the environment and an optional `.env` file
/// - The global tracing subscriber
/// - Key material, the token issuer and the refresh orchestrator
pub fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = load_config()?;

    if let Err(e) = ba_shared::logging::init(&config.logging) {
        tracing::debug!("Logging already initialized: {}", e);
    }
    tracing::info!(environment = %config.environment, "Initializing credential services...");

    let services = InfrastructureServices::build(config)?;

    tracing::info!(mode = ?services.keys.mode().kind(), "Credential services initialized successfully");
    Ok(services)
}

/// Load configuration from environment
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    // Environment-specific file first, then a plain .env if present
    dotenvy::from_filename(Environment::from_env().dotenv_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config.validate().map_err(InfrastructureError::Config)?;
    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Signing keys could not be loaded
    #[error("Key material error: {0}")]
    KeyMaterial(#[from] KeyMaterialError),
}
