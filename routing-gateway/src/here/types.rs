//! Wire types for the HERE routing API (v7 `calculateroute.json`).

use serde::Deserialize;

/// Maneuver type for walking stretches.
pub(crate) const MANEUVER_PRIVATE: &str = "PrivateTransportManeuverType";

/// Maneuver type for public transport stretches.
pub(crate) const MANEUVER_PUBLIC: &str = "PublicTransportManeuverType";

/// Top-level response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRouteResponse {
    pub response: RouteList,
}

/// Routes computed for the request. Without the `alternatives` parameter
/// the API returns at most one.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteList {
    #[serde(default)]
    pub route: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub summary: Summary,
    #[serde(default)]
    pub leg: Vec<Leg>,
    /// One entry per public transport line used; changes are one less than
    /// the number of lines.
    #[serde(default)]
    pub public_transport_line: Vec<PublicTransportLine>,
}

/// Aggregate figures for a route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Total distance in meters.
    pub distance: f64,
    /// Travel time in seconds, assuming free flow.
    pub base_time: u32,
    /// Travel time in seconds including waiting times.
    pub travel_time: u32,
    /// Departure as local time with UTC offset (RFC 3339).
    pub departure: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub maneuver: Vec<Maneuver>,
}

/// A single instruction step within a leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maneuver {
    #[serde(rename = "_type")]
    pub kind: String,
    /// Seconds spent in this maneuver.
    pub travel_time: u32,
}

/// A public transport line used by the route. Only its presence is
/// significant for the summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTransportLine {
    #[serde(default)]
    pub line_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_route_with_maneuvers() {
        let body = r#"{
            "response": {
                "route": [{
                    "summary": {
                        "distance": 8028,
                        "baseTime": 2880,
                        "travelTime": 3180,
                        "departure": "2026-03-04T18:00:00+01:00"
                    },
                    "leg": [{
                        "maneuver": [
                            {"_type": "PrivateTransportManeuverType", "travelTime": 300},
                            {"_type": "PublicTransportManeuverType", "travelTime": 2400}
                        ]
                    }],
                    "publicTransportLine": [
                        {"lineName": "U2"},
                        {"lineName": "S5"}
                    ]
                }]
            }
        }"#;
        let response: CalculateRouteResponse = serde_json::from_str(body).unwrap();
        let route = &response.response.route[0];

        assert_eq!(route.summary.base_time, 2880);
        assert_eq!(route.summary.travel_time, 3180);
        assert_eq!(route.leg[0].maneuver.len(), 2);
        assert_eq!(route.leg[0].maneuver[0].kind, MANEUVER_PRIVATE);
        assert_eq!(route.public_transport_line.len(), 2);
        assert_eq!(route.public_transport_line[0].line_name.as_deref(), Some("U2"));
    }

    #[test]
    fn missing_optional_arrays_default_to_empty() {
        let body = r#"{
            "response": {
                "route": [{
                    "summary": {
                        "distance": 900,
                        "baseTime": 700,
                        "travelTime": 700,
                        "departure": "2026-03-04T18:00:00+01:00"
                    }
                }]
            }
        }"#;
        let response: CalculateRouteResponse = serde_json::from_str(body).unwrap();
        let route = &response.response.route[0];
        assert!(route.leg.is_empty());
        assert!(route.public_transport_line.is_empty());
    }

    #[test]
    fn empty_route_list_parses() {
        let response: CalculateRouteResponse =
            serde_json::from_str(r#"{"response": {"route": []}}"#).unwrap();
        assert!(response.response.route.is_empty());
    }
}
