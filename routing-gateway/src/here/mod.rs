//! Public transport routing via the HERE routing API.
//!
//! The v7 `calculateroute.json` endpoint returns routes as a list of legs of
//! maneuvers tagged with the vehicle class that performs them; walking shares
//! of a transit trip show up as `PrivateTransportManeuverType` maneuvers.
//! Durations come in two flavours, `baseTime` (without transit waiting) and
//! `travelTime` (with it); trip times use the former, summaries the latter.

mod client;
mod convert;
mod types;

pub use client::{HereClient, HereConfig};
