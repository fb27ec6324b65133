//! AQHI OData HTTP client.

use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info};

use super::error::AqhiError;
use super::types::{ODataResponse, StationReading};

/// Alberta Environment's public AQHI OData endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://data.environment.alberta.ca/EdwServices/aqhi/odata";

/// Configuration for the AQHI client.
#[derive(Debug, Clone)]
pub struct AqhiConfig {
    /// Full URL of the OData feed
    pub endpoint: String,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl AqhiConfig {
    /// Create a config pointing at the public endpoint, with no timeout.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for AqhiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can produce the current station readings.
///
/// The page driver only depends on this trait, so tests can substitute
/// canned or failing sources for the live feed.
pub trait StationSource: Send + Sync {
    /// Fetch every station reading once.
    fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<StationReading>, AqhiError>>;
}

/// Client for the AQHI OData feed.
#[derive(Debug, Clone)]
pub struct AqhiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AqhiClient {
    /// Create a new AQHI client.
    pub fn new(config: AqhiConfig) -> Result<Self, AqhiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint,
        })
    }

    /// The URL this client fetches from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch all station readings.
    ///
    /// One request, no parameters, no pagination and no retries.
    pub async fn fetch_all(&self) -> Result<Vec<StationReading>, AqhiError> {
        debug!(endpoint = %self.endpoint, "fetching AQHI readings");

        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AqhiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: ODataResponse = serde_json::from_str(&body).map_err(|e| AqhiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        info!(stations = parsed.value.len(), "fetched AQHI readings");
        Ok(parsed.value)
    }
}

impl StationSource for AqhiClient {
    fn fetch_stations(&self) -> BoxFuture<'_, Result<Vec<StationReading>, AqhiError>> {
        Box::pin(self.fetch_all())
    }
}
