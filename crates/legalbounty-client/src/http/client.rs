/*
[INPUT]:  HTTP configuration (base URL, timeouts, bearer token)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::AppConfig;
use crate::http::{BountyError, Result};
use crate::types::ErrorBody;

/// Default base URL for the LegalBounty API
const DEFAULT_BASE_URL: &str = "https://api.legalbounty.io";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the LegalBounty API.
///
/// Clones share the bearer token, so a token stored after login is visible
/// to every handle on the same client.
#[derive(Debug, Clone)]
pub struct BountyClient {
    http_client: Client,
    base_url: Url,
    bearer: Arc<RwLock<Option<String>>>,
}

impl BountyClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client against an explicit base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client from the environment-derived application config
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), &config.api_url)
    }

    /// Store the bearer token used for authenticated requests
    pub fn set_bearer(&self, token: &str) {
        let mut guard = self.bearer.write().unwrap();
        *guard = Some(token.to_string());
    }

    /// Drop the stored bearer token
    pub fn clear_bearer(&self) {
        let mut guard = self.bearer.write().unwrap();
        *guard = None;
    }

    /// Get the stored bearer token if set
    pub fn bearer(&self) -> Option<String> {
        self.bearer.read().unwrap().clone()
    }

    /// Build request builder for unauthenticated endpoints
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder carrying the bearer token.
    ///
    /// Fails with `Unauthorized` when no token is stored, without touching
    /// the network.
    pub(crate) fn auth_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let token = self.bearer().ok_or(BountyError::Unauthorized)?;
        Ok(self.request(method, endpoint)?.bearer_auth(token))
    }

    /// Send a request and decode the JSON response, mapping non-2xx status
    /// codes onto the crate error taxonomy.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "API request failed");
        Err(map_status(status, &body))
    }
}

/// Map an error status plus response body to a `BountyError`
fn map_status(status: StatusCode, body: &str) -> BountyError {
    let envelope: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = envelope.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    match status {
        StatusCode::BAD_REQUEST => BountyError::Validation {
            field: envelope.field.unwrap_or_else(|| "request".to_string()),
            message,
        },
        StatusCode::UNAUTHORIZED => BountyError::Unauthorized,
        StatusCode::CONFLICT => BountyError::Conflict(message),
        _ => BountyError::api_error(status, message),
    }
}
