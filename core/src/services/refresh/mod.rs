//! Refresh service module
//!
//! Keeps a bearer token current against a remote token authority:
//! - Single-flight exchange of the refresh token or client credentials
//! - Bounded retry of transient failures with a growing delay
//! - Headers for authenticated outbound calls

mod config;
mod orchestrator;
mod state;
mod traits;

#[cfg(test)]
mod tests;

pub use config::RefreshConfig;
pub use orchestrator::{Grant, RefreshOrchestrator};
pub use state::RefreshState;
pub use traits::{RefreshResponse, RefreshTransport};
