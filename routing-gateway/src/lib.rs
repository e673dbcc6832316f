//! Routing gateway over external geocoding and routing providers.
//!
//! Answers: "how long does it take from A to B, walking or by public
//! transport?" behind one mode-dispatching service, with travel-time
//! matrices over many locations and address geocoding on the side.

pub mod error;
pub mod here;
pub mod limiter;
pub mod matrix;
pub mod mock;
pub mod model;
pub mod pelias;
pub mod provider;
pub mod service;
pub mod valhalla;

pub use error::{ErrorKind, RoutingError};
pub use service::{GeocodingService, RoutingConfig, RoutingService};
