//! Geographic data and projection for the world map.
//!
//! This module provides the land boundary model, dataset loaders (TopoJSON,
//! GeoJSON, shapefile), the Mercator projection, projected outline paths, and
//! painting of those outlines onto an egui canvas.

mod dataset;
mod path;
mod projection;
mod renderer;
mod topology;

pub use dataset::{GeoDataError, LandDataset, LandFeature};
pub use path::MapPath;
pub use projection::{
    wrap_longitude, MercatorProjection, DEFAULT_SCALE, DEFAULT_VERTICAL_BIAS, MAX_LATITUDE,
};
pub use renderer::{paint_land, paint_markers};
pub use topology::Topology;

/// Coarse world topology bundled with the crate.
pub static WORLD_COARSE_TOPOJSON: &str = include_str!("../../assets/world-coarse.topo.json");

/// Loads the bundled coarse world dataset.
pub fn embedded_world() -> Result<LandDataset, GeoDataError> {
    LandDataset::from_topojson(WORLD_COARSE_TOPOJSON, "countries")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_world_loads() {
        let world = embedded_world().unwrap();

        assert!(world.len() > 5);
        assert!(world.features().iter().any(|f| f.name == "Antarctica"));
        assert!(world.features().iter().any(|f| f.name == "France"));
        assert!(world.features().iter().all(|f| !f.geometry.0.is_empty()));
    }
}
