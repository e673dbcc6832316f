//! HTTP client for the Pelias geocoding API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{embedded_status_error, ErrorKind, RoutingError};
use crate::limiter::RateLimiter;
use crate::model::{Address, Location};
use crate::provider::Geocoder;

use super::types::FeatureCollection;

/// Default base URL of the geocoding API.
const DEFAULT_BASE_URL: &str = "https://search.mapzen.com";

/// Default request rate.
const DEFAULT_REQUESTS_PER_SECOND: f64 = 2.0;

/// Country filter applied to every structured search.
const COUNTRY: &str = "DE";

/// Configuration for the Pelias client.
#[derive(Debug, Clone)]
pub struct PeliasConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Sustained request rate against the API.
    pub requests_per_second: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PeliasConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the sustained request rate.
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Pelias structured geocoding endpoint.
#[derive(Debug, Clone)]
pub struct PeliasClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
}

impl PeliasClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`ErrorKind::CredentialsInvalid`] when the API key is empty
    /// or whitespace.
    pub fn new(config: PeliasConfig) -> Result<Self, RoutingError> {
        if config.api_key.trim().is_empty() {
            return Err(RoutingError::new(
                ErrorKind::CredentialsInvalid,
                "pelias api key is empty",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            limiter: Arc::new(RateLimiter::new(config.requests_per_second)),
        })
    }

    /// Run a structured search for the address and return the raw hit list.
    async fn search_structured(&self, address: &Address) -> Result<FeatureCollection, RoutingError> {
        let street = format!("{} {}", address.street(), address.house_number());
        let postal_code = address.postal_code_string();
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1/search/structured", self.base_url),
            &[
                ("address", street.as_str()),
                ("locality", address.city()),
                ("postalcode", postal_code.as_str()),
                ("country", COUNTRY),
                ("size", "1"),
                ("api_key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| {
            RoutingError::new(ErrorKind::InvalidUri, "invalid pelias search url").with_source(e)
        })?;

        self.limiter.acquire().await;
        debug!("pelias structured search request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Same body-embedded status convention as the routing engine; check
        // it before the bare HTTP status.
        if let Some(err) = embedded_status_error(&body, "pelias") {
            return Err(err);
        }
        if !status.is_success() {
            return Err(RoutingError::from_status(status.as_u16(), "pelias search"));
        }

        serde_json::from_str(&body).map_err(|e| RoutingError::decode("pelias search", e, &body))
    }
}

#[async_trait]
impl Geocoder for PeliasClient {
    async fn resolve(&self, address: &Address) -> Result<Option<Location>, RoutingError> {
        let collection = self.search_structured(address).await?;

        let Some(feature) = collection.features.into_iter().next() else {
            return Ok(None);
        };

        let coords = feature.geometry.coordinates;
        if coords.len() < 2 {
            return Err(RoutingError::new(
                ErrorKind::ResponseFormat,
                format!(
                    "pelias feature geometry has {} coordinates, expected 2",
                    coords.len()
                ),
            ));
        }

        // GeoJSON carries coordinates in longitude, latitude order.
        Ok(Some(Location::new(coords[1], coords[0])))
    }
}
