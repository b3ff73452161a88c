//! reqwest-backed PokeAPI client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{UpstreamClient, UpstreamError};
use crate::config::UpstreamConfig;

/// Map a non-success HTTP status to an upstream error.
///
/// Returns `None` for 2xx statuses.
pub fn classify_status(status: StatusCode, what: &str) -> Option<UpstreamError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(UpstreamError::NotFound(what.to_string()))
    } else if status.is_client_error() {
        Some(UpstreamError::BadRequest(format!(
            "upstream returned {} for {}",
            status.as_u16(),
            what
        )))
    } else {
        Some(UpstreamError::ServerError {
            status: status.as_u16(),
            message: format!("upstream returned {} for {}", status.as_u16(), what),
        })
    }
}

/// HTTP client for the PokeAPI entity, species and listing endpoints
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    pokemon_url: String,
    species_url: String,
    timeout: Duration,
    client: Client,
}

impl PokeApiClient {
    /// Build a client from the upstream configuration section
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Self::builder(&config.pokemon_url, &config.species_url)
            .timeout_secs(config.timeout_seconds)
            .build()
    }

    /// Creates a new client builder
    pub fn builder(pokemon_url: &str, species_url: &str) -> PokeApiClientBuilder {
        PokeApiClientBuilder::new(pokemon_url, species_url)
    }

    /// Returns the entity/listing base URL
    pub fn pokemon_url(&self) -> &str {
        &self.pokemon_url
    }

    /// Returns the species base URL
    pub fn species_url(&self) -> &str {
        &self.species_url
    }

    /// Returns the per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn entity_url(&self, identifier: &str) -> String {
        format!("{}{}", self.pokemon_url, identifier)
    }

    pub(crate) fn species_endpoint(&self, identifier: &str) -> String {
        format!("{}{}", self.species_url, identifier)
    }

    pub(crate) fn listing_url(&self, offset: i64, limit: i64) -> String {
        format!("{}?offset={}&limit={}", self.pokemon_url, offset, limit)
    }

    async fn get_json(&self, url: &str, what: &str) -> Result<Value, UpstreamError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Unreachable(format!("request timed out: {}", e))
            } else if e.is_connect() {
                UpstreamError::Unreachable(format!("failed to connect: {}", e))
            } else {
                UpstreamError::Unreachable(format!("HTTP request failed: {}", e))
            }
        })?;

        if let Some(err) = classify_status(response.status(), what) {
            tracing::debug!(url = %url, status = response.status().as_u16(), "Upstream returned error status");
            return Err(err);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::InvalidBody(format!("failed to parse {}: {}", what, e)))
    }
}

#[async_trait]
impl UpstreamClient for PokeApiClient {
    async fn fetch_entity(&self, identifier: &str) -> Result<Value, UpstreamError> {
        self.get_json(&self.entity_url(identifier), identifier).await
    }

    async fn fetch_description(&self, identifier: &str) -> Result<Value, UpstreamError> {
        self.get_json(&self.species_endpoint(identifier), identifier)
            .await
    }

    async fn fetch_listing(&self, offset: i64, limit: i64) -> Result<Value, UpstreamError> {
        if offset < 0 || limit <= 0 {
            return Err(UpstreamError::BadRequest(format!(
                "invalid page offset={} limit={}",
                offset, limit
            )));
        }
        let what = format!("listing offset={} limit={}", offset, limit);
        self.get_json(&self.listing_url(offset, limit), &what).await
    }
}

/// Builder for PokeApiClient
#[derive(Debug, Clone)]
pub struct PokeApiClientBuilder {
    pokemon_url: String,
    species_url: String,
    timeout_secs: u64,
}

impl PokeApiClientBuilder {
    /// Creates a new builder with required base URLs
    pub fn new(pokemon_url: &str, species_url: &str) -> Self {
        Self {
            pokemon_url: pokemon_url.to_string(),
            species_url: species_url.to_string(),
            timeout_secs: crate::constants::DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }

    /// Sets the per-request timeout in seconds
    pub fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Builds the PokeApiClient
    ///
    /// Base URLs get a trailing `/` appended when missing so identifiers can
    /// be concatenated directly.
    pub fn build(self) -> Result<PokeApiClient, UpstreamError> {
        if self.pokemon_url.is_empty() || self.species_url.is_empty() {
            return Err(UpstreamError::BadRequest(
                "upstream base URLs cannot be empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Unreachable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(PokeApiClient {
            pokemon_url: with_trailing_slash(self.pokemon_url),
            species_url: with_trailing_slash(self.species_url),
            timeout,
            client,
        })
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
