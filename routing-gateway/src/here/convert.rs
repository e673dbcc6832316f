//! Conversion from HERE wire types to the domain model.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};

use crate::error::{ErrorKind, RoutingError};
use crate::model::{DistanceUnit, RouteSummary, TransportMode};
use crate::provider::RouteCost;

use super::types::{MANEUVER_PRIVATE, MANEUVER_PUBLIC, Route};

fn parse_departure(raw: &str) -> Result<NaiveDateTime, RoutingError> {
    // The API reports local time with a UTC offset; the offset is dropped
    // and the local wall time kept.
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.naive_local())
        .map_err(|e| {
            RoutingError::new(
                ErrorKind::ResponseFormat,
                format!("unparseable departure \"{raw}\": {e}"),
            )
            .with_source(e)
        })
}

/// Sum the walking seconds over all maneuvers, rejecting maneuver types
/// outside the two the gateway understands.
fn walking_seconds(route: &Route) -> Result<u32, RoutingError> {
    let mut walking = 0u32;
    for leg in &route.leg {
        for maneuver in &leg.maneuver {
            match maneuver.kind.as_str() {
                MANEUVER_PRIVATE => walking += maneuver.travel_time,
                MANEUVER_PUBLIC => {}
                other => {
                    return Err(RoutingError::new(
                        ErrorKind::ResponseFormat,
                        format!("can not handle maneuver type \"{other}\" in route response"),
                    ));
                }
            }
        }
    }
    Ok(walking)
}

/// Build a public transport route summary.
///
/// The total duration is the summary's `travelTime`, which includes
/// waiting. Walking seconds come from the private-transport maneuvers; the
/// remainder (riding plus waiting) is booked as public transport time, so
/// the per-mode times always sum to the total. Distance is converted from
/// meters to kilometers.
pub(crate) fn route_summary(route: &Route) -> Result<RouteSummary, RoutingError> {
    let total = route.summary.travel_time;
    let walking = walking_seconds(route)?.min(total);
    let transit = total - walking;

    let departure = parse_departure(&route.summary.departure)?;
    let changes = route.public_transport_line.len().saturating_sub(1) as u32;

    Ok(RouteSummary::new(
        departure,
        total,
        route.summary.distance / 1000.0,
        changes,
        HashMap::from([
            (TransportMode::Walking, walking),
            (TransportMode::PublicTransport, transit),
        ]),
    ))
}

/// Time and distance of a route, as used for matrix cells and bare trip
/// times. Uses the free-flow `baseTime`; distance is converted from meters
/// to kilometers.
pub(crate) fn route_cost(route: &Route) -> RouteCost {
    RouteCost {
        time: route.summary.base_time,
        distance: route.summary.distance / 1000.0,
        unit: DistanceUnit::Kilometers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::here::types::CalculateRouteResponse;
    use chrono::NaiveDate;

    fn route(body: &str) -> Route {
        let response: CalculateRouteResponse = serde_json::from_str(body).unwrap();
        response.response.route.into_iter().next().unwrap()
    }

    fn berlin_route() -> Route {
        route(
            r#"{
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
                                {"_type": "PrivateTransportManeuverType", "travelTime": 240},
                                {"_type": "PublicTransportManeuverType", "travelTime": 2400},
                                {"_type": "PrivateTransportManeuverType", "travelTime": 180}
                            ]
                        }],
                        "publicTransportLine": [{"lineName": "U2"}, {"lineName": "S5"}]
                    }]
                }
            }"#,
        )
    }

    #[test]
    fn summary_mode_times_sum_to_total() {
        let summary = route_summary(&berlin_route()).unwrap();

        assert_eq!(summary.total_duration, 3180);
        assert_eq!(summary.mode_time(TransportMode::Walking), 420);
        // Riding plus waiting: 3180 - 420.
        assert_eq!(summary.mode_time(TransportMode::PublicTransport), 2760);

        let mode_sum: u32 = summary.mode_travel_times.values().sum();
        assert_eq!(mode_sum, summary.total_duration);
    }

    #[test]
    fn summary_arrival_is_departure_plus_duration() {
        let summary = route_summary(&berlin_route()).unwrap();
        assert_eq!(
            summary.departure_time,
            NaiveDate::from_ymd_opt(2026, 3, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap()
        );
        assert_eq!(
            summary.arrival_time - summary.departure_time,
            chrono::Duration::seconds(3180)
        );
    }

    #[test]
    fn summary_counts_changes_as_lines_minus_one() {
        let summary = route_summary(&berlin_route()).unwrap();
        assert_eq!(summary.number_of_changes, 1);
    }

    #[test]
    fn changes_saturate_at_zero_without_lines() {
        let walking_only = route(
            r#"{
                "response": {
                    "route": [{
                        "summary": {
                            "distance": 900,
                            "baseTime": 700,
                            "travelTime": 700,
                            "departure": "2026-03-04T18:00:00+01:00"
                        },
                        "leg": [{
                            "maneuver": [
                                {"_type": "PrivateTransportManeuverType", "travelTime": 700}
                            ]
                        }]
                    }]
                }
            }"#,
        );
        let summary = route_summary(&walking_only).unwrap();
        assert_eq!(summary.number_of_changes, 0);
        assert_eq!(summary.mode_time(TransportMode::PublicTransport), 0);
    }

    #[test]
    fn distance_is_converted_to_kilometers() {
        let summary = route_summary(&berlin_route()).unwrap();
        assert!((summary.total_distance - 8.028).abs() < 1e-9);
    }

    #[test]
    fn unknown_maneuver_type_is_rejected() {
        let with_ferry = route(
            r#"{
                "response": {
                    "route": [{
                        "summary": {
                            "distance": 900,
                            "baseTime": 700,
                            "travelTime": 700,
                            "departure": "2026-03-04T18:00:00+01:00"
                        },
                        "leg": [{
                            "maneuver": [{"_type": "FerryManeuverType", "travelTime": 700}]
                        }]
                    }]
                }
            }"#,
        );
        let err = route_summary(&with_ferry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
        assert!(err.to_string().contains("FerryManeuverType"));
    }

    #[test]
    fn malformed_departure_is_rejected() {
        let bad = route(
            r#"{
                "response": {
                    "route": [{
                        "summary": {
                            "distance": 900,
                            "baseTime": 700,
                            "travelTime": 700,
                            "departure": "sometime"
                        }
                    }]
                }
            }"#,
        );
        let err = route_summary(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn cost_uses_base_time_and_kilometers() {
        let cost = route_cost(&berlin_route());
        assert_eq!(cost.time, 2880);
        assert!((cost.distance - 8.028).abs() < 1e-9);
        assert_eq!(cost.unit, DistanceUnit::Kilometers);
    }
}
