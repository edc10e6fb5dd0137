//! Outbound token refresh configuration

use serde::{Deserialize, Serialize};

/// Settings for keeping a bearer token current against a remote authority
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshClientConfig {
    /// Endpoint that exchanges a refresh token for a new pair
    #[serde(default = "default_refresh_url")]
    pub refresh_endpoint_url: String,

    /// Endpoint that verifies a token remotely
    #[serde(default = "default_verify_url")]
    pub verify_endpoint_url: String,

    /// Endpoint for the client-credentials grant
    #[serde(default)]
    pub token_endpoint_url: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,

    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in seconds; doubled on each further retry
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Timeout for each request in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// Access token supplied at startup
    #[serde(default, skip_serializing)]
    pub bootstrap_access_token: Option<String>,

    /// Refresh token supplied at startup
    #[serde(default, skip_serializing)]
    pub bootstrap_refresh_token: Option<String>,
}

impl Default for RefreshClientConfig {
    fn default() -> Self {
        Self {
            refresh_endpoint_url: default_refresh_url(),
            verify_endpoint_url: default_verify_url(),
            token_endpoint_url: None,
            client_id: None,
            client_secret: None,
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay(),
            request_timeout_seconds: default_timeout(),
            bootstrap_access_token: None,
            bootstrap_refresh_token: None,
        }
    }
}

impl RefreshClientConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            refresh_endpoint_url: std::env::var("TOKEN_REFRESH_URL")
                .unwrap_or(defaults.refresh_endpoint_url),
            verify_endpoint_url: std::env::var("TOKEN_VERIFY_URL")
                .unwrap_or(defaults.verify_endpoint_url),
            token_endpoint_url: non_empty_var("TOKEN_ENDPOINT_URL"),
            client_id: non_empty_var("TOKEN_CLIENT_ID"),
            client_secret: non_empty_var("TOKEN_CLIENT_SECRET"),
            max_retries: std::env::var("TOKEN_REFRESH_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_delay_seconds: std::env::var("TOKEN_REFRESH_RETRY_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_delay_seconds),
            request_timeout_seconds: std::env::var("TOKEN_REFRESH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
            bootstrap_access_token: non_empty_var("ACCESS_TOKEN"),
            bootstrap_refresh_token: non_empty_var("REFRESH_TOKEN"),
        }
    }
}

impl RefreshClientConfig {
    /// Endpoint, id and secret for the client-credentials grant, when all three are set
    pub fn client_credentials(&self) -> Option<(&str, &str, &str)> {
        match (&self.token_endpoint_url, &self.client_id, &self.client_secret) {
            (Some(url), Some(id), Some(secret)) => Some((url, id, secret)),
            _ => None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_refresh_url() -> String {
    String::from("http://127.0.0.1:8000/api/auth/token/refresh/")
}

fn default_verify_url() -> String {
    String::from("http://127.0.0.1:8000/api/auth/token/verify/")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshClientConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_seconds, 5);
        assert_eq!(config.request_timeout_seconds, 10);
        assert!(config.refresh_endpoint_url.ends_with("/token/refresh/"));
        assert!(config.bootstrap_refresh_token.is_none());
        assert!(config.client_credentials().is_none());
    }

    #[test]
    fn test_client_credentials_need_all_three_settings() {
        let mut config = RefreshClientConfig {
            token_endpoint_url: Some("https://bank.example/oauth/token".to_string()),
            client_id: Some("ledger".to_string()),
            ..Default::default()
        };
        assert!(config.client_credentials().is_none());

        config.client_secret = Some("s3cret".to_string());
        assert_eq!(
            config.client_credentials(),
            Some(("https://bank.example/oauth/token", "ledger", "s3cret"))
        );
    }

    #[test]
    fn test_client_secret_is_not_serialized() {
        let config = RefreshClientConfig {
            client_id: Some("ledger".to_string()),
            client_secret: Some("s3cret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("ledger"));
        assert!(!json.contains("s3cret"));
    }
}
