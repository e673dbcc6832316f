//! Mock providers for testing without API access.
//!
//! The mock router serves synthetic walking trips computed from the
//! great-circle distance at a fixed speed, so tests get deterministic costs
//! without canned response files; the mock geocoder serves a fixed address
//! table. Both record the calls they receive.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::error::{ErrorKind, RoutingError};
use crate::model::{Address, DistanceUnit, Location, RouteSummary, TransportMode};
use crate::provider::{Geocoder, RouteCost, RouteProvider};

const KM_PER_MILE: f64 = 1.609_344;

/// Arguments of one recorded routing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedCall {
    pub start: Location,
    pub destination: Location,
    pub departure: Option<NaiveDateTime>,
}

/// Mock route provider that computes walking trips from coordinates.
///
/// Useful for development and testing without real routing credentials.
/// Trip time is the great-circle distance at the configured speed; summaries
/// book the whole duration as walking with zero changes. Individual
/// start/destination pairs can be scripted to fail instead.
#[derive(Debug)]
pub struct MockRouter {
    speed_kmh: f64,
    unit: DistanceUnit,
    failures: Vec<(Location, Location, ErrorKind)>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl MockRouter {
    /// Create a mock router walking at 5 km/h, reporting kilometers.
    pub fn new() -> Self {
        Self {
            speed_kmh: 5.0,
            unit: DistanceUnit::Kilometers,
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Set the walking speed in km/h.
    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    /// Set the unit reported distances are converted to.
    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Script a failure for one start/destination pair.
    ///
    /// Pairs match on exact coordinate equality, intended for fixture
    /// locations passed through unchanged.
    pub fn fail_between(mut self, start: Location, destination: Location, kind: ErrorKind) -> Self {
        self.failures.push((start, destination, kind));
        self
    }

    /// Number of routing calls received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every routing call received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn serve(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteCost, RoutingError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(RecordedCall {
            start,
            destination,
            departure,
        });

        if let Some((_, _, kind)) = self
            .failures
            .iter()
            .find(|(s, d, _)| *s == start && *d == destination)
        {
            return Err(RoutingError::new(*kind, "scripted mock failure"));
        }

        let km = start.distance_km(&destination);
        let distance = match self.unit {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km / KM_PER_MILE,
        };
        let time = (km / self.speed_kmh * 3600.0).round() as u32;

        Ok(RouteCost {
            time,
            distance,
            unit: self.unit,
        })
    }
}

impl Default for MockRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteProvider for MockRouter {
    async fn trip_time(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<u32, RoutingError> {
        Ok(self.serve(start, destination, departure).await?.time)
    }

    async fn route_summary(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteSummary, RoutingError> {
        let cost = self.serve(start, destination, departure).await?;
        // Summaries built without a departure time start at the epoch.
        let departure = departure.unwrap_or_default();
        Ok(RouteSummary::new(
            departure,
            cost.time,
            cost.distance,
            0,
            HashMap::from([(TransportMode::Walking, cost.time)]),
        ))
    }

    async fn measure(
        &self,
        start: Location,
        destination: Location,
        departure: Option<NaiveDateTime>,
    ) -> Result<RouteCost, RoutingError> {
        self.serve(start, destination, departure).await
    }
}

/// Mock geocoder backed by a fixed address table.
///
/// Unknown addresses resolve to `Ok(None)`, mirroring a provider that found
/// no match; the whole geocoder can be scripted to fail instead.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    table: HashMap<Address, Location>,
    fail: Option<ErrorKind>,
    call_count: AtomicUsize,
}

impl MockGeocoder {
    /// Create an empty mock geocoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one address to the table.
    pub fn with(mut self, address: Address, location: Location) -> Self {
        self.table.insert(address, location);
        self
    }

    /// Make every lookup fail with the given kind.
    pub fn failing(mut self, kind: ErrorKind) -> Self {
        self.fail = Some(kind);
        self
    }

    /// Number of lookups received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn resolve(&self, address: &Address) -> Result<Option<Location>, RoutingError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.fail {
            return Err(RoutingError::new(kind, "scripted mock failure"));
        }
        Ok(self.table.get(address).copied())
    }
}

/// Well-known Berlin locations used as test fixtures.
pub mod berlin {
    use crate::model::{BoundingBox, Location};

    pub const TU_BERLIN: Location = Location::new(52.51221, 13.32697);
    pub const HAUPTBAHNHOF: Location = Location::new(52.524742, 13.369563);
    pub const BRANDENBURGER_TOR: Location = Location::new(52.516289, 13.377729);
    pub const POTSDAMER_PLATZ: Location = Location::new(52.509498, 13.376598);
    pub const SIEGESSAEULE: Location = Location::new(52.51458, 13.35015);
    pub const ALEXANDERPLATZ: Location = Location::new(52.520699, 13.410964);

    /// Box around the Berlin city area containing all fixtures above.
    pub const BOUNDING_BOX: BoundingBox =
        BoundingBox::new(13.0904186037, 52.3685305255, 13.739978, 52.654269);
}
