//! Route summaries returned by the routing operations.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use super::TransportMode;

/// Summary of a single trip from one location to another.
///
/// Two facts hold for every summary produced by this crate:
///
/// - the per-mode travel times sum to `total_duration`;
/// - `departure_time + total_duration == arrival_time` (whole seconds).
///
/// [`RouteSummary::new`] derives the arrival time from the departure time
/// and duration, so the second fact holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// When the trip starts.
    pub departure_time: NaiveDateTime,
    /// When the trip ends.
    pub arrival_time: NaiveDateTime,
    /// Total travel time in whole seconds, including waiting.
    pub total_duration: u32,
    /// Total travelled distance; unit depends on the provider (walking
    /// summaries report the configured unit, transit reports kilometers).
    pub total_distance: f64,
    /// Number of vehicle changes. Zero for walking.
    pub number_of_changes: u32,
    /// Seconds spent per transport mode.
    pub mode_travel_times: HashMap<TransportMode, u32>,
}

impl RouteSummary {
    /// Build a summary, deriving the arrival time from departure and
    /// duration.
    pub fn new(
        departure_time: NaiveDateTime,
        total_duration: u32,
        total_distance: f64,
        number_of_changes: u32,
        mode_travel_times: HashMap<TransportMode, u32>,
    ) -> Self {
        let arrival_time = departure_time + Duration::seconds(i64::from(total_duration));
        Self {
            departure_time,
            arrival_time,
            total_duration,
            total_distance,
            number_of_changes,
            mode_travel_times,
        }
    }

    /// Seconds spent in the given mode; zero when the mode does not occur.
    pub fn mode_time(&self, mode: TransportMode) -> u32 {
        self.mode_travel_times.get(&mode).copied().unwrap_or(0)
    }
}
