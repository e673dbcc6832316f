//! Conversion from Valhalla wire types to the domain model.
//!
//! Provider quirks are normalized here, so the rest of the crate only sees
//! well-formed domain values.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};

use crate::error::{ErrorKind, RoutingError};
use crate::model::{DistanceUnit, RouteSummary, TransportMode};
use crate::provider::RawMatrixEntry;

use super::types::{MatrixCell, MatrixKind, RouteResponse};

/// Repair timestamps that lack the sign of their UTC offset.
///
/// Some engine builds render `2017-03-08T16:3401:00` instead of
/// `2017-03-08T16:34+01:00` (valhalla-docs#13). When the character after
/// the minutes is neither `+` nor `-`, a `+` is inserted. Well-formed
/// timestamps pass through unchanged.
pub(crate) fn normalize_offset_sign(raw: &str) -> Cow<'_, str> {
    if !raw.is_char_boundary(16) {
        return Cow::Borrowed(raw);
    }
    match raw.as_bytes().get(16) {
        Some(b'+') | Some(b'-') | None => Cow::Borrowed(raw),
        Some(_) => Cow::Owned(format!("{}+{}", &raw[..16], &raw[16..])),
    }
}

/// Parse a location `date_time` into a local timestamp.
///
/// The wire format is minute-granular local time with a UTC offset, e.g.
/// `2026-03-04T18:00+01:00`. The offset is dropped after parsing; the
/// gateway works in provider-local time throughout.
pub(crate) fn parse_date_time(raw: &str) -> Result<NaiveDateTime, RoutingError> {
    let normalized = normalize_offset_sign(raw);
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z")
        .map(|parsed| parsed.naive_local())
        .map_err(|e| {
            RoutingError::new(
                ErrorKind::ResponseFormat,
                format!("unparseable date_time \"{raw}\": {e}"),
            )
            .with_source(e)
        })
}

/// Build a walking route summary from a route response.
///
/// The departure time is taken from the first trip location; the arrival
/// time is derived from departure plus duration, which keeps the summary
/// invariants exact even though the wire timestamps are minute-granular.
pub(crate) fn walking_summary(response: &RouteResponse) -> Result<RouteSummary, RoutingError> {
    let summary = response.trip.summary;
    let duration = summary.time.max(0.0).round() as u32;

    let raw_departure = response
        .trip
        .locations
        .first()
        .and_then(|location| location.date_time.as_deref())
        .ok_or_else(|| {
            RoutingError::new(
                ErrorKind::ResponseFormat,
                "route response carried no departure date_time",
            )
        })?;
    let departure = parse_date_time(raw_departure)?;

    Ok(RouteSummary::new(
        departure,
        duration,
        summary.length,
        0,
        HashMap::from([(TransportMode::Walking, duration)]),
    ))
}

/// Extract the raw cells of a matrix response.
///
/// The envelope key equals the requested matrix kind; under it the engine
/// nests one array of cells per source row.
pub(crate) fn matrix_entries(
    kind: MatrixKind,
    body: &str,
    unit: DistanceUnit,
) -> Result<Vec<RawMatrixEntry>, RoutingError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RoutingError::decode("matrix response", e, body))?;

    let rows_value = value.get(kind.api_str()).ok_or_else(|| {
        RoutingError::new(
            ErrorKind::ResponseFormat,
            format!("matrix response has no \"{}\" field", kind.api_str()),
        )
    })?;

    let rows: Vec<Vec<MatrixCell>> = serde_json::from_value(rows_value.clone())
        .map_err(|e| RoutingError::decode("matrix response rows", e, body))?;

    Ok(rows
        .into_iter()
        .flatten()
        .map(|cell| RawMatrixEntry {
            from_index: cell.from_index,
            to_index: cell.to_index,
            time: cell.time.max(0.0).round() as u32,
            distance: cell.distance,
            unit,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn route_response(body: &str) -> RouteResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn wellformed_positive_offset_is_untouched() {
        let raw = "2026-03-04T18:00+01:00";
        assert!(matches!(normalize_offset_sign(raw), Cow::Borrowed(_)));
    }

    #[test]
    fn wellformed_negative_offset_is_untouched() {
        let raw = "2026-03-04T18:00-05:00";
        assert!(matches!(normalize_offset_sign(raw), Cow::Borrowed(_)));
    }

    #[test]
    fn missing_sign_is_repaired() {
        assert_eq!(
            normalize_offset_sign("2017-03-08T16:3401:00"),
            "2017-03-08T16:34+01:00"
        );
    }

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(normalize_offset_sign("2017-03-08"), "2017-03-08");
        assert_eq!(normalize_offset_sign(""), "");
    }

    #[test]
    fn parses_wellformed_date_time() {
        let parsed = parse_date_time("2026-03-04T18:00+01:00").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2026, 3, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn parses_date_time_with_missing_sign() {
        let parsed = parse_date_time("2026-03-04T18:0001:00").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2026, 3, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn garbage_date_time_is_a_format_error() {
        let err = parse_date_time("yesterday at noon").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn walking_summary_holds_its_invariants() {
        let response = route_response(
            r#"{
                "trip": {
                    "summary": {"time": 1245.4, "length": 1.73},
                    "locations": [
                        {"date_time": "2026-03-04T18:00+01:00"},
                        {"date_time": "2026-03-04T18:21+01:00"}
                    ]
                }
            }"#,
        );
        let summary = walking_summary(&response).unwrap();

        assert_eq!(summary.total_duration, 1245);
        assert_eq!(summary.number_of_changes, 0);
        assert_eq!(summary.mode_time(TransportMode::Walking), 1245);

        let mode_sum: u32 = summary.mode_travel_times.values().sum();
        assert_eq!(mode_sum, summary.total_duration);
        assert_eq!(
            summary.arrival_time - summary.departure_time,
            chrono::Duration::seconds(1245)
        );
    }

    #[test]
    fn walking_summary_without_date_time_is_rejected() {
        let response = route_response(
            r#"{"trip": {"summary": {"time": 600, "length": 0.8}, "locations": [{}]}}"#,
        );
        let err = walking_summary(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn one_to_many_cells_are_flattened() {
        let body = r#"{
            "one_to_many": [[
                {"from_index": 0, "to_index": 0, "time": 0, "distance": 0.0},
                {"from_index": 0, "to_index": 1, "time": 721, "distance": 1.06},
                {"from_index": 0, "to_index": 2, "time": 1800, "distance": 2.54}
            ]],
            "units": "km"
        }"#;
        let entries =
            matrix_entries(MatrixKind::OneToMany, body, DistanceUnit::Kilometers).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].to_index, 1);
        assert_eq!(entries[1].time, 721);
        assert_eq!(entries[1].unit, DistanceUnit::Kilometers);
    }

    #[test]
    fn many_to_one_rows_are_flattened() {
        let body = r#"{
            "many_to_one": [
                [{"from_index": 0, "to_index": 0, "time": 700, "distance": 1.0}],
                [{"from_index": 1, "to_index": 0, "time": 800, "distance": 1.2}],
                [{"from_index": 2, "to_index": 0, "time": 0, "distance": 0.0}]
            ],
            "units": "km"
        }"#;
        let entries =
            matrix_entries(MatrixKind::ManyToOne, body, DistanceUnit::Kilometers).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].from_index, 1);
    }

    #[test]
    fn missing_matrix_key_is_a_format_error() {
        let err = matrix_entries(
            MatrixKind::SourcesToTargets,
            r#"{"one_to_many": []}"#,
            DistanceUnit::Kilometers,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }

    #[test]
    fn malformed_cells_are_a_format_error() {
        let err = matrix_entries(
            MatrixKind::OneToMany,
            r#"{"one_to_many": [[{"from_index": 0, "to_index": 1, "time": null}]]}"#,
            DistanceUnit::Kilometers,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
    }
}
