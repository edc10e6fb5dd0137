//! Token service module for JWT management
//!
//! This module handles local token operations:
//! - Key material loading for shared-secret (HS*) and RSA (RS*) signing
//! - Access and refresh token issuance
//! - Signature, expiry and subject validation

mod clock;
mod config;
mod issuer;
mod key_manager;
mod validator;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use key_manager::{AsymmetricKeys, KeyMaterialProvider, SigningMode, SymmetricKeys};
pub use validator::{TokenValidator, ValidationResult};
