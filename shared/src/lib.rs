//! Shared utilities and common types for the banking API credential services
//!
//! This crate provides functionality used across all workspace members:
//! - Configuration types (signing mode, refresh client, environment)
//! - Logging bootstrap

pub mod config;
pub mod logging;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, JwtConfig, LogFormat, LoggingConfig, RefreshClientConfig,
    SigningModeKind,
};
