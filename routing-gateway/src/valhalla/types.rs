//! Wire types for the Valhalla routing engine.
//!
//! Requests are serialized into a single `json` query parameter; responses
//! are plain JSON. Matrix responses use the requested matrix kind as the
//! envelope key, so the kind doubles as endpoint name and response key.

use serde::{Deserialize, Serialize};

use crate::model::Location;

/// Costing model for pedestrian routing.
pub(crate) const COSTING_PEDESTRIAN: &str = "pedestrian";

/// `date_time.type` for "depart at the given time".
pub(crate) const DATE_TIME_DEPART_AT: u8 = 1;

/// A coordinate pair as the engine expects it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationParam {
    pub lat: f64,
    pub lon: f64,
}

impl From<Location> for LocationParam {
    fn from(location: Location) -> Self {
        Self {
            lat: location.latitude,
            lon: location.longitude,
        }
    }
}

/// Departure time attached to a route request.
#[derive(Debug, Clone, Serialize)]
pub struct DateTimeParam {
    #[serde(rename = "type")]
    pub kind: u8,
    /// Local time formatted `%Y-%m-%dT%H:%M`.
    pub value: String,
}

/// Pedestrian costing options.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PedestrianOptions {
    /// Walking speed in km/h.
    pub walking_speed: f64,
}

/// Costing options envelope.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CostingOptions {
    pub pedestrian: PedestrianOptions,
}

/// Body of a `route` request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub locations: Vec<LocationParam>,
    pub costing: &'static str,
    pub units: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<CostingOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTimeParam>,
}

/// Body of a matrix request.
///
/// One-to-many and many-to-one use a single `locations` list (with the
/// origin first, or the destination last); sources-to-targets names the two
/// sides explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LocationParam>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<LocationParam>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<LocationParam>>,
    pub costing: &'static str,
    pub units: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<CostingOptions>,
}

/// The three matrix shapes the engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    OneToMany,
    ManyToOne,
    SourcesToTargets,
}

impl MatrixKind {
    /// Endpoint path segment; also the key of the response envelope.
    pub fn api_str(&self) -> &'static str {
        match self {
            MatrixKind::OneToMany => "one_to_many",
            MatrixKind::ManyToOne => "many_to_one",
            MatrixKind::SourcesToTargets => "sources_to_targets",
        }
    }
}

/// Response to a `route` request.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub trip: Trip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub summary: TripSummary,
    #[serde(default)]
    pub locations: Vec<TripLocation>,
}

/// Aggregate figures for a computed trip.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TripSummary {
    /// Travel time in seconds. The engine reports fractional seconds.
    pub time: f64,
    /// Travel distance in the requested units.
    pub length: f64,
}

/// A request location echoed back with scheduling information.
#[derive(Debug, Clone, Deserialize)]
pub struct TripLocation {
    /// Local departure/arrival time, minute granularity, with UTC offset.
    /// Only present when the request carried a `date_time`.
    #[serde(default)]
    pub date_time: Option<String>,
}

/// One cell of a matrix response.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatrixCell {
    pub from_index: usize,
    pub to_index: usize,
    /// Travel time in seconds.
    pub time: f64,
    /// Travel distance in the requested units.
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_request_omits_absent_options() {
        let request = RouteRequest {
            locations: vec![Location::new(52.5, 13.3).into()],
            costing: COSTING_PEDESTRIAN,
            units: "km",
            costing_options: None,
            date_time: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("costing_options"));
        assert!(!json.contains("date_time"));
        assert!(json.contains("\"costing\":\"pedestrian\""));
    }

    #[test]
    fn date_time_uses_wire_field_name() {
        let request = RouteRequest {
            locations: vec![],
            costing: COSTING_PEDESTRIAN,
            units: "km",
            costing_options: None,
            date_time: Some(DateTimeParam {
                kind: DATE_TIME_DEPART_AT,
                value: "2026-03-04T18:00".to_string(),
            }),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"date_time\":{\"type\":1,\"value\":\"2026-03-04T18:00\"}"));
    }

    #[test]
    fn matrix_kind_names_match_endpoints() {
        assert_eq!(MatrixKind::OneToMany.api_str(), "one_to_many");
        assert_eq!(MatrixKind::ManyToOne.api_str(), "many_to_one");
        assert_eq!(MatrixKind::SourcesToTargets.api_str(), "sources_to_targets");
    }

    #[test]
    fn route_response_parses() {
        let body = r#"{
            "trip": {
                "summary": {"time": 1245.3, "length": 1.73},
                "locations": [
                    {"date_time": "2026-03-04T18:00+01:00"},
                    {"date_time": "2026-03-04T18:20+01:00"}
                ],
                "status": 0
            }
        }"#;
        let response: RouteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.trip.summary.time, 1245.3);
        assert_eq!(response.trip.locations.len(), 2);
    }
}
