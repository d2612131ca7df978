//! Memoization of projected land outlines.
//!
//! Projecting every land feature is the most expensive step of a render, so
//! the last result is kept and reused while the dataset, exclusions, canvas
//! size and projection constants stay the same. Markers are always
//! re-projected, through the cached projection.

use super::render::{check_canvas_size, place_markers, project_features};
use super::{Marker, ProjectedFeature, ProjectionParams, RegionExclusions, RenderedMap};
use crate::geo::{LandDataset, MercatorProjection};
use eframe::egui::Vec2;
use std::sync::Arc;

/// Cache key identifying the inputs of a feature projection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RenderCacheKey {
    /// Content signature of the land dataset
    pub dataset_signature: u64,
    /// Signature of the hidden region set
    pub exclusion_signature: u64,
    /// Canvas width and height as raw bits
    pub dimensions: (u32, u32),
    /// Scale and vertical bias as raw bits
    pub projection: (u64, u64),
}

impl RenderCacheKey {
    pub fn new(
        dataset: &LandDataset,
        excluded: &RegionExclusions,
        size: Vec2,
        params: ProjectionParams,
    ) -> Self {
        Self {
            dataset_signature: dataset.signature(),
            exclusion_signature: excluded.signature(),
            dimensions: (size.x.to_bits(), size.y.to_bits()),
            projection: (params.scale.to_bits(), params.vertical_bias.to_bits()),
        }
    }
}

struct CacheEntry {
    key: RenderCacheKey,
    projection: MercatorProjection,
    features: Arc<[ProjectedFeature]>,
}

/// Single-entry render cache for the world map.
#[derive(Default)]
pub struct MapRenderCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl MapRenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the cache holds outlines for the given key.
    pub fn is_valid(&self, key: &RenderCacheKey) -> bool {
        self.entry.as_ref().is_some_and(|e| &e.key == key)
    }

    /// Renders the map, reusing cached outlines when the inputs are unchanged.
    pub fn render<'m, T>(
        &mut self,
        dataset: &LandDataset,
        excluded: &RegionExclusions,
        size: Vec2,
        params: ProjectionParams,
        markers: &'m [Marker<T>],
    ) -> RenderedMap<'m, T> {
        let key = RenderCacheKey::new(dataset, excluded, size, params);

        let entry = match self.entry.take() {
            Some(entry) if entry.key == key => {
                self.hits += 1;
                entry
            }
            _ => {
                self.misses += 1;
                check_canvas_size(size);
                log::debug!(
                    "Projecting {} land features for {}x{} canvas",
                    dataset.len(),
                    size.x,
                    size.y
                );

                let projection = params.projection_for(size);
                let features = project_features(dataset.features(), excluded, &projection);
                CacheEntry {
                    key,
                    projection,
                    features: features.into(),
                }
            }
        };

        let map = RenderedMap {
            projection: entry.projection,
            size,
            features: Arc::clone(&entry.features),
            markers: place_markers(markers, &entry.projection),
        };
        self.entry = Some(entry);
        map
    }

    /// Invalidate the cache, forcing a full projection on next render.
    pub fn invalidate(&mut self) {
        log::debug!("Invalidating world map render cache");
        self.entry = None;
    }

    /// Number of renders served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of renders that had to project the dataset.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::render::tests::sample_features;
    use crate::map::render_world_map;

    fn dataset() -> LandDataset {
        LandDataset::new(sample_features())
    }

    #[test]
    fn test_repeat_render_hits_cache() {
        let dataset = dataset();
        let exclusions = RegionExclusions::default();
        let size = Vec2::new(200.0, 100.0);
        let params = ProjectionParams::default();
        let markers: Vec<Marker<u8>> = vec![Marker::new(2.0, 46.0, 1)];
        let mut cache = MapRenderCache::new();

        let first = cache.render(&dataset, &exclusions, size, params, &markers);
        let second = cache.render(&dataset, &exclusions, size, params, &markers);

        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert!(Arc::ptr_eq(&first.features, &second.features));
        assert_eq!(first.markers, second.markers);
    }

    #[test]
    fn test_any_input_change_misses() {
        let dataset = dataset();
        let markers: Vec<Marker<()>> = Vec::new();
        let default_params = ProjectionParams::default();
        let wide = Vec2::new(201.0, 100.0);
        let mut cache = MapRenderCache::new();

        let hide_antarctica = RegionExclusions::default();
        cache.render(&dataset, &hide_antarctica, Vec2::new(200.0, 100.0), default_params, &markers);
        cache.render(&dataset, &hide_antarctica, wide, default_params, &markers);

        let show_all = RegionExclusions::none();
        cache.render(&dataset, &show_all, wide, default_params, &markers);

        let zoomed = ProjectionParams {
            scale: 150.0,
            ..Default::default()
        };
        cache.render(&dataset, &show_all, wide, zoomed, &markers);

        let mut renamed = sample_features();
        renamed[1].name = "Gaul".to_string();
        let other = LandDataset::new(renamed);
        let map = cache.render(&other, &show_all, wide, zoomed, &markers);

        assert_eq!(cache.misses(), 5);
        assert_eq!(cache.hits(), 0);
        assert_eq!(map.features[1].name, "Gaul");
    }

    #[test]
    fn test_cached_output_matches_uncached() {
        let dataset = dataset();
        let exclusions = RegionExclusions::default();
        let markers = vec![Marker::new(-3.7, 40.4, "madrid"), Marker::Absent];
        let size = Vec2::new(640.0, 480.0);
        let params = ProjectionParams::default();
        let mut cache = MapRenderCache::new();

        cache.render(&dataset, &exclusions, size, params, &markers);
        let cached = cache.render(&dataset, &exclusions, size, params, &markers);
        let fresh = render_world_map(dataset.features(), &exclusions, size, params, &markers);

        assert_eq!(cache.hits(), 1);
        assert_eq!(cached.features, fresh.features);
        assert_eq!(cached.markers, fresh.markers);
        assert_eq!(cached.projection, fresh.projection);
    }

    #[test]
    fn test_markers_are_reprojected_on_hit() {
        let dataset = dataset();
        let exclusions = RegionExclusions::default();
        let size = Vec2::new(300.0, 300.0);
        let params = ProjectionParams::default();
        let mut cache = MapRenderCache::new();

        let before = vec![Marker::new(0.0, 0.0, 'a')];
        let after = vec![Marker::new(30.0, 0.0, 'b'), Marker::new(0.0, 0.0, 'c')];
        let first = cache.render(&dataset, &exclusions, size, params, &before);
        let second = cache.render(&dataset, &exclusions, size, params, &after);

        assert_eq!(cache.hits(), 1);
        assert_eq!(second.markers.len(), 2);
        assert_eq!(second.markers[1].position, first.markers[0].position);
        assert!(second.markers[0].position.x > second.markers[1].position.x);
    }

    #[test]
    fn test_invalidate() {
        let dataset = dataset();
        let exclusions = RegionExclusions::default();
        let size = Vec2::new(300.0, 300.0);
        let params = ProjectionParams::default();
        let markers: Vec<Marker<()>> = Vec::new();
        let mut cache = MapRenderCache::new();

        cache.render(&dataset, &exclusions, size, params, &markers);
        let key = RenderCacheKey::new(&dataset, &exclusions, size, params);
        assert!(cache.is_valid(&key));

        cache.invalidate();
        assert!(!cache.is_valid(&key));
        cache.render(&dataset, &exclusions, size, params, &markers);
        assert_eq!(cache.misses(), 2);
    }
}
