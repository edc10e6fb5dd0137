//! Business services containing token logic.

pub mod refresh;
pub mod token;

// Re-export commonly used types
pub use refresh::{Grant, RefreshConfig, RefreshOrchestrator, RefreshResponse, RefreshState, RefreshTransport};
pub use token::{
    Clock, KeyMaterialProvider, ManualClock, SigningMode, SystemClock, TokenIssuer, TokenServiceConfig,
    TokenValidator, ValidationResult,
};
