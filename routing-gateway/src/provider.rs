//! Capability traits implemented by provider adapters.
//!
//! The aggregation layer talks to providers exclusively through these
//! traits, which keeps concrete adapters swappable and lets tests inject
//! deterministic implementations (see [`crate::mock`]).

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RoutingError;
use crate::model::{Address, DistanceUnit, Location, RouteSummary};

/// A single origin-to-destination measurement used for matrix assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteCost {
    /// Travel time in whole seconds.
    pub time: u32,
    /// Travel distance, measured in `unit`.
    pub distance: f64,
    /// Unit of `distance`.
    pub unit: DistanceUnit,
}

/// A matrix cell as a provider reported it.
///
/// The indices are positions in the location list the *provider* saw, which
/// may include entries the caller never asked for (an origin prepended to a
/// one-to-many request, a destination appended to a many-to-one request).
/// The matrix assembler renumbers these into caller indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMatrixEntry {
    /// Row in the provider's location list.
    pub from_index: usize,
    /// Column in the provider's location list.
    pub to_index: usize,
    /// Travel time in whole seconds.
    pub time: u32,
    /// Travel distance, measured in `unit`.
    pub distance: f64,
    /// Unit of `distance`.
    pub unit: DistanceUnit,
}

/// Resolves postal addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address to a location.
    ///
    /// Returns `Ok(None)` when the provider knows no match; errors are
    /// reserved for failures of the lookup itself.
    async fn resolve(&self, address: &Address) -> Result<Option<Location>, RoutingError>;
}

/// Answers trip questions for a single transport mode.
///
/// `departure` is optional at this boundary: walking providers may ignore
/// it (walking time does not depend on the clock), while transit providers
/// need it to pick connections.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Travel time from `start` to `destination` in whole seconds.
    async fn trip_time(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<u32, RoutingError>;

    /// Full summary of the best trip from `start` to `destination`.
    async fn route_summary(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteSummary, RoutingError>;

    /// One pairwise measurement, used by the matrix assembler when the
    /// provider has no native matrix endpoint.
    async fn measure(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteCost, RoutingError>;

    /// The provider's native matrix endpoints, if it has any.
    fn batch_matrix(&self) -> Option<&dyn BatchMatrixProvider> {
        None
    }
}

/// Native matrix endpoints offered by some routing providers.
///
/// All three calls return provider-local [`RawMatrixEntry`] values; the
/// assembler owns renumbering and validation.
#[async_trait]
pub trait BatchMatrixProvider: Send + Sync {
    /// Costs from one origin to every destination.
    ///
    /// The origin is part of the provider's location list, so responses
    /// include a reserved origin-to-origin cell at `to_index` 0.
    async fn one_to_many(
        &self,
        origin: Location,
        destinations: &[Location],
    ) -> Result<Vec<RawMatrixEntry>, RoutingError>;

    /// Costs from every origin to one destination.
    ///
    /// The destination is appended to the provider's location list, which
    /// produces a synthetic destination-to-destination row past the last
    /// origin.
    async fn many_to_one(
        &self,
        origins: &[Location],
        destination: Location,
    ) -> Result<Vec<RawMatrixEntry>, RoutingError>;

    /// Costs for the full cross product of sources and targets.
    async fn sources_to_targets(
        &self,
        sources: &[Location],
        targets: &[Location],
    ) -> Result<Vec<RawMatrixEntry>, RoutingError>;
}
