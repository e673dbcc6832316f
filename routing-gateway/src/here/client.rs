//! HTTP client for the HERE routing API.
//!
//! Serves the public transport side of the gateway. The API takes all
//! parameters in the query string, including the `app_id`/`app_code`
//! credential pair, and has no matrix endpoint; matrices over this provider
//! are assembled from pairwise route requests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{ErrorKind, RoutingError};
use crate::limiter::RateLimiter;
use crate::model::{Location, RouteSummary};
use crate::provider::{RouteCost, RouteProvider};

use super::convert;
use super::types::{CalculateRouteResponse, Route};

/// Default base URL of the routing API.
const DEFAULT_BASE_URL: &str = "https://route.cit.api.here.com/routing/7.2";

/// Default request rate.
// TODO: raise the default once the plan's real request allowance is known.
const DEFAULT_REQUESTS_PER_SECOND: f64 = 1.0;

/// Configuration for the HERE client.
#[derive(Debug, Clone)]
pub struct HereConfig {
    /// Application id of the credential pair.
    pub app_id: String,
    /// Application code of the credential pair.
    pub app_code: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Sustained request rate against the API.
    pub requests_per_second: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HereConfig {
    /// Create a new config with the given credential pair.
    pub fn new(app_id: impl Into<String>, app_code: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_code: app_code.into(),
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

/// Client for the HERE routing API.
#[derive(Debug, Clone)]
pub struct HereClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_code: String,
    limiter: Arc<RateLimiter>,
}

impl HereClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`ErrorKind::CredentialsInvalid`] when either half of the
    /// credential pair is empty or whitespace.
    pub fn new(config: HereConfig) -> Result<Self, RoutingError> {
        if config.app_id.trim().is_empty() || config.app_code.trim().is_empty() {
            return Err(RoutingError::new(
                ErrorKind::CredentialsInvalid,
                "here app id or app code is empty",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            app_id: config.app_id,
            app_code: config.app_code,
            limiter: Arc::new(RateLimiter::new(config.requests_per_second)),
        })
    }

    /// Request the best public transport route between two locations.
    async fn calculate_route(
        &self,
        start: Location,
        destination: Location,
        departure: NaiveDateTime,
    ) -> Result<Route, RoutingError> {
        let waypoint0 = format!("geo!{},{}", start.latitude, start.longitude);
        let waypoint1 = format!("geo!{},{}", destination.latitude, destination.longitude);
        let departure = departure.format("%Y-%m-%dT%H:%M:%S").to_string();

        let url = reqwest::Url::parse_with_params(
            &format!("{}/calculateroute.json", self.base_url),
            &[
                ("app_id", self.app_id.as_str()),
                ("app_code", self.app_code.as_str()),
                ("waypoint0", waypoint0.as_str()),
                ("waypoint1", waypoint1.as_str()),
                ("departure", departure.as_str()),
                ("mode", "fastest;publicTransport"),
                ("combineChange", "true"),
            ],
        )
        .map_err(|e| {
            RoutingError::new(ErrorKind::InvalidUri, "invalid here calculateroute url")
                .with_source(e)
        })?;

        self.limiter.acquire().await;
        debug!("here calculateroute request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RoutingError::from_status(
                status.as_u16(),
                "here calculateroute",
            ));
        }

        let parsed: CalculateRouteResponse = serde_json::from_str(&body)
            .map_err(|e| RoutingError::decode("here calculateroute", e, &body))?;

        parsed.response.route.into_iter().next().ok_or_else(|| {
            RoutingError::new(
                ErrorKind::ResponseFormat,
                "here response does not contain any routes",
            )
        })
    }
}

fn required_departure(departure: Option<NaiveDateTime>) -> Result<NaiveDateTime, RoutingError> {
    departure.ok_or_else(|| {
        RoutingError::new(
            ErrorKind::BadRequest,
            "a departure time is required for public transport routing",
        )
    })
}

#[async_trait]
impl RouteProvider for HereClient {
    async fn trip_time(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<u32, RoutingError> {
        let departure = required_departure(departure)?;
        let route = self.calculate_route(start, destination, departure).await?;
        Ok(convert::route_cost(&route).time)
    }

    async fn route_summary(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteSummary, RoutingError> {
        let departure = required_departure(departure)?;
        let route = self.calculate_route(start, destination, departure).await?;
        convert::route_summary(&route)
    }

    async fn measure(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteCost, RoutingError> {
        let departure = required_departure(departure)?;
        let route = self.calculate_route(start, destination, departure).await?;
        Ok(convert::route_cost(&route))
    }
}
