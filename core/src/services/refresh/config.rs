//! Configuration for the refresh orchestrator

use std::time::Duration;

use ba_shared::config::RefreshClientConfig;

/// Retry and timeout policy for token exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry
    pub retry_delay: Duration,
    /// Upper bound on a single exchange attempt
    pub request_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&RefreshClientConfig> for RefreshConfig {
    fn from(config: &RefreshClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }
}

impl RefreshConfig {
    /// Total requests made before giving up
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_delay.saturating_mul(factor)
    }
}
