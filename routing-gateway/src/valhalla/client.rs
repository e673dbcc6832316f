//! HTTP client for a Valhalla routing engine.
//!
//! Serves walking trips and native time/distance matrices. Requests are
//! paced by a shared [`RateLimiter`] and authenticated with an API key
//! passed as a query parameter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::{self, ErrorKind, RoutingError};
use crate::limiter::RateLimiter;
use crate::model::{DistanceUnit, Location, RouteSummary};
use crate::provider::{BatchMatrixProvider, RawMatrixEntry, RouteCost, RouteProvider};

use super::convert;
use super::types::{
    COSTING_PEDESTRIAN, CostingOptions, DATE_TIME_DEPART_AT, DateTimeParam, LocationParam,
    MatrixKind, MatrixRequest, PedestrianOptions, RouteRequest, RouteResponse,
};

/// Default base URL for the routing engine.
const DEFAULT_BASE_URL: &str = "https://valhalla.mapzen.com";

/// Default request rate.
const DEFAULT_REQUESTS_PER_SECOND: f64 = 2.0;

/// Configuration for the Valhalla client.
#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    /// API key passed with every request.
    pub api_key: String,
    /// Base URL of the engine (defaults to the hosted service).
    pub base_url: String,
    /// Unit reported for distances.
    pub units: DistanceUnit,
    /// Pedestrian walking speed in km/h; engine default when unset.
    pub walking_speed_kmh: Option<f64>,
    /// Sustained request rate against the engine.
    pub requests_per_second: f64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ValhallaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DistanceUnit::Kilometers,
            walking_speed_kmh: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or self-hosted engines).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the unit distances are reported in.
    pub fn with_units(mut self, units: DistanceUnit) -> Self {
        self.units = units;
        self
    }

    /// Set the pedestrian walking speed in km/h.
    pub fn with_walking_speed(mut self, kmh: f64) -> Self {
        self.walking_speed_kmh = Some(kmh);
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

/// Client for a Valhalla routing engine.
///
/// Implements walking [`RouteProvider`] queries plus the engine's native
/// matrix endpoints as a [`BatchMatrixProvider`].
#[derive(Debug, Clone)]
pub struct ValhallaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    units: DistanceUnit,
    walking_speed_kmh: Option<f64>,
    limiter: Arc<RateLimiter>,
}

impl ValhallaClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`ErrorKind::CredentialsInvalid`] when the API key is
    /// empty or whitespace; no request is ever attempted with blank
    /// credentials.
    pub fn new(config: ValhallaConfig) -> Result<Self, RoutingError> {
        if config.api_key.trim().is_empty() {
            return Err(RoutingError::new(
                ErrorKind::CredentialsInvalid,
                "valhalla api key is empty",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            units: config.units,
            walking_speed_kmh: config.walking_speed_kmh,
            limiter: Arc::new(RateLimiter::new(config.requests_per_second)),
        })
    }

    fn costing_options(&self) -> Option<CostingOptions> {
        self.walking_speed_kmh.map(|walking_speed| CostingOptions {
            pedestrian: PedestrianOptions { walking_speed },
        })
    }

    /// Issue a GET with the serialized request in the `json` query
    /// parameter, returning the response body.
    async fn fetch(&self, endpoint: &str, request: &impl Serialize) -> Result<String, RoutingError> {
        let json = serde_json::to_string(request).map_err(|e| {
            RoutingError::new(ErrorKind::InvalidUri, "could not serialize request json")
                .with_source(e)
        })?;

        let url = reqwest::Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            &[("json", json.as_str()), ("api_key", self.api_key.as_str())],
        )
        .map_err(|e| {
            RoutingError::new(
                ErrorKind::InvalidUri,
                format!("invalid valhalla url for endpoint {endpoint}"),
            )
            .with_source(e)
        })?;

        self.limiter.acquire().await;
        debug!(endpoint, "valhalla request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // The engine reports failures inside the body; prefer that over the
        // bare HTTP status when both are present.
        if let Some(err) = error::embedded_status_error(&body, "valhalla") {
            return Err(err);
        }
        if !status.is_success() {
            return Err(RoutingError::from_status(
                status.as_u16(),
                &format!("valhalla {endpoint}"),
            ));
        }

        Ok(body)
    }

    /// Compute a pedestrian route between two locations.
    async fn route(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteResponse, RoutingError> {
        let request = RouteRequest {
            locations: vec![start.into(), destination.into()],
            costing: COSTING_PEDESTRIAN,
            units: self.units.api_str(),
            costing_options: self.costing_options(),
            date_time: departure.map(|at| DateTimeParam {
                kind: DATE_TIME_DEPART_AT,
                value: at.format("%Y-%m-%dT%H:%M").to_string(),
            }),
        };

        let body = self.fetch("route", &request).await?;
        serde_json::from_str(&body).map_err(|e| RoutingError::decode("valhalla route", e, &body))
    }

    async fn matrix(
        &self,
        kind: MatrixKind,
        request: MatrixRequest,
    ) -> Result<Vec<RawMatrixEntry>, RoutingError> {
        let body = self.fetch(kind.api_str(), &request).await?;
        convert::matrix_entries(kind, &body, self.units)
    }

    fn matrix_request(&self) -> MatrixRequest {
        MatrixRequest {
            locations: None,
            sources: None,
            targets: None,
            costing: COSTING_PEDESTRIAN,
            units: self.units.api_str(),
            costing_options: self.costing_options(),
        }
    }
}

#[async_trait]
impl RouteProvider for ValhallaClient {
    async fn trip_time(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<u32, RoutingError> {
        let response = self.route(start, destination, departure).await?;
        Ok(response.trip.summary.time.max(0.0).round() as u32)
    }

    async fn route_summary(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteSummary, RoutingError> {
        let response = self.route(start, destination, departure).await?;
        convert::walking_summary(&response)
    }

    async fn measure(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteCost, RoutingError> {
        let response = self.route(start, destination, departure).await?;
        Ok(RouteCost {
            time: response.trip.summary.time.max(0.0).round() as u32,
            distance: response.trip.summary.length,
            unit: self.units,
        })
    }

    fn batch_matrix(&self) -> Option<&dyn BatchMatrixProvider> {
        Some(self)
    }
}

#[async_trait]
impl BatchMatrixProvider for ValhallaClient {
    async fn one_to_many(
        &self,
        origin: Location,
        destinations: &[Location],
    ) -> Result<Vec<RawMatrixEntry>, RoutingError> {
        let mut locations = Vec::with_capacity(destinations.len() + 1);
        locations.push(origin.into());
        locations.extend(destinations.iter().map(|&location| LocationParam::from(location)));

        let request = MatrixRequest {
            locations: Some(locations),
            ..self.matrix_request()
        };
        self.matrix(MatrixKind::OneToMany, request).await
    }

    async fn many_to_one(
        &self,
        origins: &[Location],
        destination: Location,
    ) -> Result<Vec<RawMatrixEntry>, RoutingError> {
        let mut locations: Vec<_> = origins.iter().map(|&location| location.into()).collect();
        locations.push(destination.into());

        let request = MatrixRequest {
            locations: Some(locations),
            ..self.matrix_request()
        };
        self.matrix(MatrixKind::ManyToOne, request).await
    }

    async fn sources_to_targets(
        &self,
        sources: &[Location],
        targets: &[Location],
    ) -> Result<Vec<RawMatrixEntry>, RoutingError> {
        let request = MatrixRequest {
            sources: Some(sources.iter().map(|&location| location.into()).collect()),
            targets: Some(targets.iter().map(|&location| location.into()).collect()),
            ..self.matrix_request()
        };
        self.matrix(MatrixKind::SourcesToTargets, request).await
    }
}
