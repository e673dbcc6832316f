//! Geographic coordinates and areas.

use std::fmt;

/// A point on the earth as WGS84 decimal degrees.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180], but the
/// ranges are not enforced: provider responses are passed through untouched,
/// and the providers themselves reject coordinates they cannot serve.
///
/// # Examples
///
/// ```
/// use routing_gateway::model::Location;
///
/// let tu_berlin = Location::new(52.51221, 13.32697);
/// assert_eq!(tu_berlin.latitude, 52.51221);
/// assert_eq!(tu_berlin.longitude, 13.32697);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl Location {
    /// Create a location from latitude and longitude in decimal degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another location in kilometers.
    ///
    /// Uses the Haversine formula. Good enough for sanity checks and for
    /// synthesizing plausible trip costs in tests; real distances come from
    /// the routing providers.
    pub fn distance_km(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        // Rounding can push `a` past 1.0 for antipodal points, which would
        // make the square root below NaN.
        let a = ((delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2))
        .min(1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// An axis-aligned geographic rectangle.
///
/// Only used to bound sample data (e.g. "somewhere in Berlin") in tests and
/// demos; no routing operation takes a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_longitude: f64,
    min_latitude: f64,
    max_longitude: f64,
    max_latitude: f64,
}

impl BoundingBox {
    /// Create a bounding box from its south-west and north-east extents.
    pub const fn new(
        min_longitude: f64,
        min_latitude: f64,
        max_longitude: f64,
        max_latitude: f64,
    ) -> Self {
        Self {
            min_longitude,
            min_latitude,
            max_longitude,
            max_latitude,
        }
    }

    /// Whether a location lies within the box (borders inclusive).
    pub fn contains(&self, location: &Location) -> bool {
        location.longitude >= self.min_longitude
            && location.longitude <= self.max_longitude
            && location.latitude >= self.min_latitude
            && location.latitude <= self.max_latitude
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn location_in(bbox: BoundingBox) -> impl Strategy<Value = Location> {
        (
            bbox.min_latitude..=bbox.max_latitude,
            bbox.min_longitude..=bbox.max_longitude,
        )
            .prop_map(|(lat, lon)| Location::new(lat, lon))
    }

    proptest! {
        /// Any point generated inside a box is reported as contained.
        #[test]
        fn generated_points_are_contained(
            location in location_in(BoundingBox::new(13.0904186037, 52.3685305255, 13.739978, 52.654269))
        ) {
            let berlin = BoundingBox::new(13.0904186037, 52.3685305255, 13.739978, 52.654269);
            prop_assert!(berlin.contains(&location));
        }

        /// Haversine distance is never negative and never exceeds half the
        /// earth's circumference.
        #[test]
        fn distance_is_bounded(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let d = Location::new(lat1, lon1).distance_km(&Location::new(lat2, lon2));
            prop_assert!(d >= 0.0);
            prop_assert!(d <= 20_038.0);
        }
    }
}
