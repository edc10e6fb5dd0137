//! Scripted token authority for orchestrator tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::RefreshError;
use crate::services::refresh::{RefreshResponse, RefreshTransport};

/// Answers exchanges from a script, then with a fallback
pub struct MockRefreshTransport {
    script: Mutex<VecDeque<Result<RefreshResponse, RefreshError>>>,
    fallback: Result<RefreshResponse, RefreshError>,
    latency: Duration,
    exchanges: AtomicUsize,
    acquisitions: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
    verify_result: Option<serde_json::Value>,
}

impl MockRefreshTransport {
    /// Every exchange succeeds with `access`
    pub fn succeeding(access: &str) -> Self {
        Self::with_fallback(Ok(response(access, None)))
    }

    /// Every exchange fails with `error`
    pub fn failing(error: RefreshError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<RefreshResponse, RefreshError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            latency: Duration::ZERO,
            exchanges: AtomicUsize::new(0),
            acquisitions: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
            verify_result: None,
        }
    }

    /// Results returned before the fallback applies
    pub fn with_script(self, script: Vec<Result<RefreshResponse, RefreshError>>) -> Self {
        *self.script.lock().unwrap() = script.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_verify_result(mut self, payload: serde_json::Value) -> Self {
        self.verify_result = Some(payload);
        self
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    /// Client-credentials requests received
    pub fn acquire_count(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }
}

pub fn response(access: &str, refresh: Option<&str>) -> RefreshResponse {
    RefreshResponse {
        access: access.to_string(),
        refresh: refresh.map(str::to_string),
    }
}

pub fn network_error() -> RefreshError {
    RefreshError::Network {
        message: "connection refused".to_string(),
    }
}

impl MockRefreshTransport {
    async fn answer(&self) -> Result<RefreshResponse, RefreshError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl RefreshTransport for MockRefreshTransport {
    async fn exchange(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(refresh_token.to_string());
        self.answer().await
    }

    async fn acquire(&self) -> Result<RefreshResponse, RefreshError> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.answer().await
    }

    async fn verify(&self, _token: &str) -> Result<Option<serde_json::Value>, RefreshError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.verify_result.clone())
    }
}
