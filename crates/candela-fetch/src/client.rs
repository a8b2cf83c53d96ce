//! HTTP clients for the generator and history services.

use async_trait::async_trait;
use candela_types::{CurrencyPair, Tick};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::url::{DEFAULT_GENERATOR_URL, DEFAULT_HISTORY_URL, rates_url};
use crate::{HistorySource, RateSource};

/// Configuration shared by the service clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from the request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration with default timeouts for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATOR_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("candela/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while fetching ticks.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response did not carry the expected tick payload.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Returns true if the service answered but its payload was unusable.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// Thin wrapper over a pooled HTTP client that decodes tick arrays.
#[derive(Debug, Clone)]
struct TickClient {
    client: Client,
    config: ClientConfig,
}

impl TickClient {
    fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    async fn get_ticks(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<Tick>, FetchError> {
        debug!(url, "requesting ticks");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        decode_ticks(&body)
    }
}

/// Decodes a JSON array of wire ticks.
fn decode_ticks(body: &[u8]) -> Result<Vec<Tick>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::MalformedResponse("empty body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

/// HTTP client for the generator service (live feed).
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    inner: TickClient,
}

impl GeneratorClient {
    /// Creates a new generator client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            inner: TickClient::new(config)?,
        })
    }

    /// Creates a client for the generator at its default address.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::new(DEFAULT_GENERATOR_URL))
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

#[async_trait]
impl RateSource for GeneratorClient {
    async fn values(&self, currency_pair: &CurrencyPair) -> Result<Vec<Tick>, FetchError> {
        let url = rates_url(&self.inner.config.base_url, currency_pair);
        self.inner.get_ticks(&url, &[]).await
    }
}

/// HTTP client for the history service (backfill).
#[derive(Debug, Clone)]
pub struct HistoryClient {
    inner: TickClient,
}

impl HistoryClient {
    /// Creates a new history client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            inner: TickClient::new(config)?,
        })
    }

    /// Creates a client for the history service at its default address.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::new(DEFAULT_HISTORY_URL))
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

#[async_trait]
impl HistorySource for HistoryClient {
    async fn rates(
        &self,
        currency_pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tick>, FetchError> {
        let url = rates_url(&self.inner.config.base_url, currency_pair);
        let query = [
            ("from", from.to_rfc3339_opts(SecondsFormat::Micros, true)),
            ("to", to.to_rfc3339_opts(SecondsFormat::Micros, true)),
        ];
        self.inner.get_ticks(&url, &query).await
    }
}
