//! Matrix cells and the units their distances are measured in.

use std::fmt;

/// Unit of a reported distance.
///
/// Every [`TimeMatrixEntry`] carries the unit its distance was measured in;
/// entries are never converted to a common unit after the fact. Within a
/// single provider response the unit is uniform, so mixed units can only
/// appear when results from different providers are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl DistanceUnit {
    /// Wire name understood by the routing providers.
    pub fn api_str(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_str())
    }
}

/// One cell of a travel-time matrix.
///
/// `from_index` and `to_index` refer to positions in the start and
/// destination arrays the caller passed to the matrix operation; they are
/// not provider-internal indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMatrixEntry {
    /// Index into the caller's start locations.
    pub from_index: usize,
    /// Index into the caller's destination locations.
    pub to_index: usize,
    /// Travel time in whole seconds.
    pub time: u32,
    /// Travel distance, measured in `unit`.
    pub distance: f64,
    /// Unit of `distance`.
    pub unit: DistanceUnit,
}

impl TimeMatrixEntry {
    /// Create a matrix cell.
    pub fn new(from_index: usize, to_index: usize, time: u32, distance: f64, unit: DistanceUnit) -> Self {
        Self {
            from_index,
            to_index,
            time,
            distance,
            unit,
        }
    }
}
