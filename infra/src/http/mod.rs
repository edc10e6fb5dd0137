//! HTTP clients for the remote token authority

pub mod refresh_client;

pub use refresh_client::HttpRefreshTransport;
