//! Mode-dispatching routing and geocoding facades.
//!
//! [`RoutingService`] owns one provider slot per transport mode and builds
//! the concrete client lazily on first use, so a service can be constructed
//! without touching any credentials and only fails when a mode is actually
//! exercised. A failed construction leaves its slot empty and is retried on
//! the next call. [`GeocodingService`] does the same for the geocoder slot.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::error::{ErrorKind, RoutingError};
use crate::here::{HereClient, HereConfig};
use crate::matrix::build_matrix;
use crate::model::{Address, Location, RouteSummary, TimeMatrixEntry, TransportMode};
use crate::pelias::{PeliasClient, PeliasConfig};
use crate::provider::{Geocoder, RouteProvider};
use crate::valhalla::{ValhallaClient, ValhallaConfig};

/// Environment variable holding the Mapzen API key (walking and geocoding).
pub const ENV_MAPZEN_KEY: &str = "API_KEY_MAPZEN";
/// Environment variable holding the HERE application id.
pub const ENV_HERE_APP_ID: &str = "API_HERE_APP_ID";
/// Environment variable holding the HERE application code.
pub const ENV_HERE_APP_CODE: &str = "API_HERE_APP_CODE";

/// Provider configuration for [`RoutingService`].
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Walking provider configuration.
    pub valhalla: ValhallaConfig,
    /// Public transport provider configuration.
    pub here: HereConfig,
}

impl RoutingConfig {
    /// Bundle per-provider configurations.
    pub fn new(valhalla: ValhallaConfig, here: HereConfig) -> Self {
        Self { valhalla, here }
    }

    /// Read credentials from the environment.
    ///
    /// Missing variables are warned about and left empty; the affected
    /// provider then fails with [`ErrorKind::CredentialsInvalid`] on first
    /// use instead of at startup.
    pub fn from_env() -> Self {
        Self {
            valhalla: ValhallaConfig::new(env_or_warn(ENV_MAPZEN_KEY)),
            here: HereConfig::new(
                env_or_warn(ENV_HERE_APP_ID),
                env_or_warn(ENV_HERE_APP_CODE),
            ),
        }
    }
}

fn env_or_warn(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        warn!("{name} not set; requests that need it will fail");
        String::new()
    })
}

/// Routing operations dispatched by transport mode.
///
/// Walking goes to Valhalla, public transport to HERE. Each provider slot
/// is filled on first use; construction failures (bad credentials, say)
/// surface on every call for that mode until construction succeeds.
pub struct RoutingService {
    config: Option<RoutingConfig>,
    walking: OnceCell<Arc<dyn RouteProvider>>,
    transit: OnceCell<Arc<dyn RouteProvider>>,
}

impl RoutingService {
    /// Create a service that builds providers from `config` on demand.
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            config: Some(config),
            walking: OnceCell::new(),
            transit: OnceCell::new(),
        }
    }

    /// Create a service configured from the environment.
    pub fn from_env() -> Self {
        Self::new(RoutingConfig::from_env())
    }

    /// Create a service over externally constructed providers.
    ///
    /// Used by tests to inject mocks; the slots start filled and no
    /// configuration is required.
    pub fn with_providers(
        walking: Arc<dyn RouteProvider>,
        transit: Arc<dyn RouteProvider>,
    ) -> Self {
        Self {
            config: None,
            walking: OnceCell::new_with(Some(walking)),
            transit: OnceCell::new_with(Some(transit)),
        }
    }

    /// Travel time in whole seconds between two locations.
    pub async fn trip_time(
        &self,
        mode: TransportMode,
        start: Location,
        destination: Location,
        departure: NaiveDateTime,
    ) -> Result<u32, RoutingError> {
        let provider = self.provider(mode).await?;
        provider
            .trip_time(start, destination, departure_for(mode, departure))
            .await
    }

    /// Summary of the best trip between two locations.
    pub async fn route_summary(
        &self,
        mode: TransportMode,
        start: Location,
        destination: Location,
        departure: NaiveDateTime,
    ) -> Result<RouteSummary, RoutingError> {
        let provider = self.provider(mode).await?;
        // Summaries anchor their timestamps on the departure, so it is
        // forwarded even for walking.
        provider
            .route_summary(start, destination, Some(departure))
            .await
    }

    /// Travel-time matrix over every start/destination combination.
    ///
    /// See [`build_matrix`] for ordering and failure behavior.
    pub async fn travel_time_matrix(
        &self,
        mode: TransportMode,
        starts: &[Location],
        destinations: &[Location],
        departure: NaiveDateTime,
    ) -> Result<Vec<TimeMatrixEntry>, RoutingError> {
        let provider = self.provider(mode).await?;
        build_matrix(
            provider.as_ref(),
            starts,
            destinations,
            departure_for(mode, departure),
        )
        .await
    }

    async fn provider(
        &self,
        mode: TransportMode,
    ) -> Result<&Arc<dyn RouteProvider>, RoutingError> {
        match mode {
            TransportMode::Walking => {
                self.walking
                    .get_or_try_init(|| async {
                        let config = self.config_ref()?;
                        Ok(Arc::new(ValhallaClient::new(config.valhalla.clone())?)
                            as Arc<dyn RouteProvider>)
                    })
                    .await
            }
            TransportMode::PublicTransport => {
                self.transit
                    .get_or_try_init(|| async {
                        let config = self.config_ref()?;
                        Ok(Arc::new(HereClient::new(config.here.clone())?)
                            as Arc<dyn RouteProvider>)
                    })
                    .await
            }
        }
    }

    fn config_ref(&self) -> Result<&RoutingConfig, RoutingError> {
        self.config.as_ref().ok_or_else(|| {
            RoutingError::new(
                ErrorKind::Internal,
                "no provider configuration was supplied",
            )
        })
    }
}

/// Departure forwarded to the provider for cost queries.
///
/// Walking costs do not depend on the clock, so the walking provider is
/// asked without one; transit connections do, so the departure is kept.
fn departure_for(mode: TransportMode, departure: NaiveDateTime) -> Option<NaiveDateTime> {
    match mode {
        TransportMode::Walking => None,
        TransportMode::PublicTransport => Some(departure),
    }
}

/// Address resolution behind a lazily built geocoder.
pub struct GeocodingService {
    config: Option<PeliasConfig>,
    geocoder: OnceCell<Arc<dyn Geocoder>>,
}

impl GeocodingService {
    /// Create a service that builds the geocoder from `config` on demand.
    pub fn new(config: PeliasConfig) -> Self {
        Self {
            config: Some(config),
            geocoder: OnceCell::new(),
        }
    }

    /// Create a service configured from the environment.
    ///
    /// Geocoding shares the Mapzen API key with the walking provider.
    pub fn from_env() -> Self {
        Self::new(PeliasConfig::new(env_or_warn(ENV_MAPZEN_KEY)))
    }

    /// Create a service over an externally constructed geocoder.
    pub fn with_geocoder(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            config: None,
            geocoder: OnceCell::new_with(Some(geocoder)),
        }
    }

    /// Resolve an address to a location, `Ok(None)` when nothing matches.
    pub async fn resolve_address(
        &self,
        address: &Address,
    ) -> Result<Option<Location>, RoutingError> {
        let geocoder = self.client().await?;
        geocoder.resolve(address).await
    }

    async fn client(&self) -> Result<&Arc<dyn Geocoder>, RoutingError> {
        self.geocoder
            .get_or_try_init(|| async {
                let config = self.config.as_ref().ok_or_else(|| {
                    RoutingError::new(
                        ErrorKind::Internal,
                        "no geocoder configuration was supplied",
                    )
                })?;
                Ok(Arc::new(PeliasClient::new(config.clone())?) as Arc<dyn Geocoder>)
            })
            .await
    }
}
