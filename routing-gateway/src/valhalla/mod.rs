//! Valhalla routing engine adapter.
//!
//! Serves the walking side of the gateway: pedestrian routes plus the
//! engine's native one_to_many / many_to_one / sources_to_targets matrix
//! endpoints. Requests travel as a JSON document in the `json` query
//! parameter, authenticated by an `api_key` parameter; failures may be
//! reported as a `status_code` field inside the body rather than on the
//! HTTP status line.

mod client;
mod convert;
mod types;

pub use client::{ValhallaClient, ValhallaConfig};
pub use types::MatrixKind;
