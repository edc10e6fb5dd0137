//! Token authority client over HTTP
//!
//! One request per call. The refresh exchange posts a form; the
//! client-credentials grant posts JSON. Status handling:
//! - 2xx: body parsed as `{"access": ..., "refresh": ...}` or the
//!   `access_token`/`refresh_token` equivalent
//! - 4xx: `Rejected`, never retried by the orchestrator
//! - anything else, connection failures included: `Network`
//! - client-side timeout: `Timeout`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, warn};

use ba_core::domain::entities::mask_token;
use ba_core::errors::RefreshError;
use ba_core::services::refresh::{RefreshResponse, RefreshTransport};
use ba_shared::config::RefreshClientConfig;

use crate::InfrastructureError;

/// `reqwest` implementation of [`RefreshTransport`]
#[derive(Debug, Clone)]
pub struct HttpRefreshTransport {
    client: Client,
    refresh_url: String,
    verify_url: String,
    client_credentials: Option<ClientCredentials>,
}

#[derive(Clone)]
struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl HttpRefreshTransport {
    /// Creates a transport whose requests time out after `timeout`
    pub fn new(
        refresh_url: impl Into<String>,
        verify_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            refresh_url: refresh_url.into(),
            verify_url: verify_url.into(),
            client_credentials: None,
        })
    }

    /// Enables [`RefreshTransport::acquire`] against `token_url`
    pub fn with_client_credentials(
        mut self,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_credentials = Some(ClientCredentials {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        });
        self
    }

    pub fn from_config(config: &RefreshClientConfig) -> Result<Self, InfrastructureError> {
        let transport = Self::new(
            config.refresh_endpoint_url.clone(),
            config.verify_endpoint_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )?;
        Ok(match config.client_credentials() {
            Some((url, id, secret)) => transport.with_client_credentials(url, id, secret),
            None => transport,
        })
    }

    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }

    pub fn verify_url(&self) -> &str {
        &self.verify_url
    }
}

fn send_error(e: reqwest::Error) -> RefreshError {
    if e.is_timeout() {
        RefreshError::Timeout
    } else {
        RefreshError::Network { message: e.to_string() }
    }
}

async fn read_body(response: Response) -> Result<String, RefreshError> {
    response.text().await.map_err(send_error)
}

/// Sends a token request and maps the status onto [`RefreshError`]
async fn request_tokens(request: RequestBuilder) -> Result<RefreshResponse, RefreshError> {
    let response = request.send().await.map_err(send_error)?;

    let status = response.status();
    if status.is_success() {
        let body = read_body(response).await?;
        return serde_json::from_str::<RefreshResponse>(&body).map_err(|e| {
            warn!(error = %e, "Unparsable token response");
            RefreshError::InvalidResponse { message: e.to_string() }
        });
    }

    let body = read_body(response).await.unwrap_or_default();
    if status.is_client_error() {
        warn!(status = status.as_u16(), "Token request rejected");
        Err(RefreshError::Rejected {
            status: status.as_u16(),
            body,
        })
    } else {
        warn!(status = status.as_u16(), "Token authority unavailable");
        Err(RefreshError::Network {
            message: format!("unexpected status: {} | body: {}", status, body),
        })
    }
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn exchange(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        debug!(url = %self.refresh_url, refresh_token = %mask_token(refresh_token), "POST refresh");

        request_tokens(self.client.post(&self.refresh_url).form(&[("refresh", refresh_token)])).await
    }

    async fn acquire(&self) -> Result<RefreshResponse, RefreshError> {
        let credentials = self
            .client_credentials
            .as_ref()
            .ok_or(RefreshError::MissingClientCredentials)?;
        debug!(url = %credentials.token_url, client_id = %credentials.client_id, "POST client credentials");

        let payload = json!({
            "grant_type": "client_credentials",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
        });
        request_tokens(self.client.post(&credentials.token_url).json(&payload)).await
    }

    async fn verify(&self, token: &str) -> Result<Option<serde_json::Value>, RefreshError> {
        debug!(url = %self.verify_url, token = %mask_token(token), "POST verify");

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("token", token)])
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(status = status.as_u16(), "Token not verified");
            return Ok(None);
        }

        let body = read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Some(serde_json::Value::Object(Default::default())));
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| RefreshError::InvalidResponse { message: e.to_string() })
    }
}
