//! Domain types shared by all providers.
//!
//! These are the normalized types the gateway speaks: coordinates,
//! addresses, transport modes, matrix cells and route summaries. Provider
//! wire formats are converted into these types at the adapter boundary, so
//! the rest of the crate never sees provider-specific shapes.

mod address;
mod entry;
mod location;
mod mode;
mod route;

pub use address::{Address, AddressBuilder, InvalidAddress};
pub use entry::{DistanceUnit, TimeMatrixEntry};
pub use location::{BoundingBox, Location};
pub use mode::TransportMode;
pub use route::RouteSummary;
