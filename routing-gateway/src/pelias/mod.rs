//! Address geocoding via the Pelias search API.
//!
//! Only the structured search endpoint is used: street and house number,
//! locality and postal code go out as separate query parameters, scoped to
//! Germany, and the single best hit comes back as a GeoJSON feature.

mod client;
mod types;

pub use client::{PeliasClient, PeliasConfig};
