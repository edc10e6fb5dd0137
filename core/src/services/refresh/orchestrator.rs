//! Client-side token refresh orchestration
//!
//! Keeps one access/refresh pair current for outbound calls. Concurrent
//! callers that need new credentials share a single exchange: the first
//! caller starts it as a spawned task and everyone else awaits the same
//! result, whichever grant started it. A caller giving up does not cancel
//! the exchange for the others.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use ba_shared::config::RefreshClientConfig;

use crate::domain::entities::{mask_token, TokenPair, BEARER};
use crate::errors::RefreshError;

use super::config::RefreshConfig;
use super::state::RefreshState;
use super::traits::{RefreshResponse, RefreshTransport};

type SharedExchange = Shared<BoxFuture<'static, Result<TokenPair, RefreshError>>>;

/// How new credentials are obtained from the authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Exchange the held refresh token
    RefreshToken,
    /// Authenticate as the client itself
    ClientCredentials,
}

struct Inner {
    transport: Arc<dyn RefreshTransport>,
    config: RefreshConfig,
    state: RwLock<RefreshState>,
    in_flight: Mutex<Option<SharedExchange>>,
}

/// Handle to a process-wide token pair
///
/// Clones share state and the in-flight exchange.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RefreshOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshOrchestrator")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl RefreshOrchestrator {
    pub fn new(transport: Arc<dyn RefreshTransport>, config: RefreshConfig, initial: RefreshState) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                state: RwLock::new(initial),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Creates an orchestrator seeded with the bootstrap tokens from configuration
    pub fn from_config(transport: Arc<dyn RefreshTransport>, config: &RefreshClientConfig) -> Self {
        let initial = RefreshState::bootstrap(
            config.bootstrap_access_token.clone(),
            config.bootstrap_refresh_token.clone(),
        );
        Self::new(transport, RefreshConfig::from(config), initial)
    }

    /// Returns the cached access token, refreshing first when there is none
    pub async fn current_access_token(&self) -> Result<String, RefreshError> {
        if let Some(token) = self.inner.state.read().await.current_access.clone() {
            return Ok(token);
        }

        debug!("No access token cached, refreshing");
        self.refresh().await.map(|pair| pair.access_token)
    }

    /// Exchanges the current refresh token for a new access token
    ///
    /// Joins the exchange already in flight if there is one. On success the
    /// state is replaced in one step; on failure it is left untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The pair now held by the orchestrator
    /// * `Err(RefreshError::MissingRefreshToken)` - Nothing to exchange
    /// * `Err(RefreshError::Rejected)` - The authority refused the refresh token
    /// * `Err(RefreshError::InvalidResponse)` - The authority answered without an access token
    /// * `Err(RefreshError::Failed)` - Transient failures outlasted the retry budget
    pub async fn refresh(&self) -> Result<TokenPair, RefreshError> {
        self.single_flight(Grant::RefreshToken).await
    }

    /// Obtains a fresh pair with the client-credentials grant
    ///
    /// Used at startup when no refresh token was supplied, or after the
    /// authority rejected the refresh token. Shares the retry policy and the
    /// in-flight slot with [`Self::refresh`].
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The pair now held by the orchestrator
    /// * `Err(RefreshError::MissingClientCredentials)` - The transport has no client credentials
    /// * `Err(RefreshError::Rejected)` - The authority refused the credentials
    pub async fn acquire(&self) -> Result<TokenPair, RefreshError> {
        self.single_flight(Grant::ClientCredentials).await
    }

    async fn single_flight(&self, grant: Grant) -> Result<TokenPair, RefreshError> {
        let exchange = {
            let mut slot = self.inner.in_flight.lock().await;
            match slot.as_ref() {
                Some(existing) => {
                    debug!(?grant, "Joining in-flight credential exchange");
                    existing.clone()
                }
                None => {
                    let exchange = self.start_exchange(grant);
                    *slot = Some(exchange.clone());
                    exchange
                }
            }
        };

        exchange.await
    }

    fn start_exchange(&self, grant: Grant) -> SharedExchange {
        let task_inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { task_inner.run_exchange(grant).await });

        let inner = Arc::clone(&self.inner);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "Token refresh task aborted");
                    inner.in_flight.lock().await.take();
                    Err(RefreshError::Aborted { message: e.to_string() })
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Builds headers for an outbound call
    ///
    /// Uses `token` when given, otherwise the current access token.
    pub async fn authenticated_headers(&self, token: Option<&str>) -> Result<HashMap<String, String>, RefreshError> {
        let token = match token {
            Some(token) => token.to_string(),
            None => self.current_access_token().await?,
        };

        Ok(HashMap::from([
            ("Authorization".to_string(), format!("{} {}", BEARER, token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]))
    }

    /// Asks the remote authority to verify a token
    ///
    /// Single attempt under the request timeout. `Ok(None)` means the
    /// authority answered but did not accept the token.
    pub async fn verify_remote(&self, token: &str) -> Result<Option<serde_json::Value>, RefreshError> {
        debug!(token = %mask_token(token), "Verifying token remotely");
        match tokio::time::timeout(self.inner.config.request_timeout, self.inner.transport.verify(token)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Remote token verification timed out");
                Err(RefreshError::Timeout)
            }
        }
    }

    /// Drops the cached access token so the next caller refreshes
    pub async fn invalidate_access_token(&self) {
        self.inner.state.write().await.current_access = None;
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> RefreshState {
        self.inner.state.read().await.clone()
    }

    pub async fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.read().await.last_refreshed_at
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.inner.config
    }
}

impl Inner {
    async fn run_exchange(&self, grant: Grant) -> Result<TokenPair, RefreshError> {
        let outcome = self.exchange_and_apply(grant).await;
        self.in_flight.lock().await.take();
        outcome
    }

    async fn exchange_and_apply(&self, grant: Grant) -> Result<TokenPair, RefreshError> {
        let refresh_token = match grant {
            Grant::RefreshToken => Some(
                self.state
                    .read()
                    .await
                    .current_refresh
                    .clone()
                    .ok_or(RefreshError::MissingRefreshToken)?,
            ),
            Grant::ClientCredentials => None,
        };

        let response = match self.exchange_with_retry(refresh_token.as_deref()).await {
            Ok(response) => response,
            Err(e) => {
                error!(?grant, error = %e, code = e.code(), "Credential exchange failed");
                return Err(e);
            }
        };

        let mut state = self.state.write().await;
        state.apply(response.access, response.refresh, Utc::now());

        let access_token = state.current_access.clone().unwrap_or_default();
        let refresh_token = state.current_refresh.clone().or(refresh_token).unwrap_or_default();
        info!(?grant, access_token = %mask_token(&access_token), "Token refreshed");

        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Runs up to `max_retries + 1` attempts. Only transient failures are
    /// retried; the delay doubles after each one.
    ///
    /// `refresh_token` selects the grant: `None` means client credentials.
    async fn exchange_with_retry(&self, refresh_token: Option<&str>) -> Result<RefreshResponse, RefreshError> {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts, "Exchanging credentials");

            let err = match self.exchange_once(refresh_token).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if !err.is_transient() {
                warn!(attempt, error = %err, "Credential exchange failed, not retrying");
                return Err(err);
            }

            if attempt >= max_attempts {
                return Err(RefreshError::Failed {
                    attempts: attempt,
                    cause: Box::new(err),
                });
            }

            let delay = self.config.delay_after(attempt);
            warn!(attempt, max_attempts, error = %err, "Credential exchange attempt failed, retrying after {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn exchange_once(&self, refresh_token: Option<&str>) -> Result<RefreshResponse, RefreshError> {
        let request = async {
            match refresh_token {
                Some(token) => self.transport.exchange(token).await,
                None => self.transport.acquire().await,
            }
        };
        let response = tokio::time::timeout(self.config.request_timeout, request)
            .await
            .map_err(|_| RefreshError::Timeout)??;

        if response.access.trim().is_empty() {
            return Err(RefreshError::InvalidResponse {
                message: "response carries no access token".to_string(),
            });
        }
        Ok(response)
    }
}
