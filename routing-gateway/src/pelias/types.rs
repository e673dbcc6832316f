//! Response types for the Pelias geocoding API.

use serde::Deserialize;

/// GeoJSON feature collection returned by the search endpoints.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single geocoding hit.
#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

/// Point geometry of a hit, coordinates in `[longitude, latitude]` order.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}
