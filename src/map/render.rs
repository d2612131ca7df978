//! World map rendering: exclusion filtering, projection, and marker placement.

use super::{HoverTarget, Marker, PlacedMarker, RegionExclusions};
use crate::config::MapStyle;
use crate::geo::{
    paint_land, paint_markers, LandFeature, MapPath, MercatorProjection, DEFAULT_SCALE,
    DEFAULT_VERTICAL_BIAS,
};
use eframe::egui::{Painter, Pos2, Vec2};
use std::sync::Arc;

/// Fixed projection constants for the world map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub scale: f64,
    /// Downward shift of the map center in canvas pixels
    pub vertical_bias: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            vertical_bias: DEFAULT_VERTICAL_BIAS,
        }
    }
}

impl ProjectionParams {
    /// Builds the projection for a canvas of the given size.
    pub fn projection_for(&self, size: Vec2) -> MercatorProjection {
        MercatorProjection::for_canvas(size, self.scale, self.vertical_bias)
    }
}

/// A retained land feature with its projected outline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    /// Position of the feature in the source dataset
    pub index: usize,
    pub name: String,
    pub path: MapPath,
}

/// Output of one render pass.
///
/// Feature paths and marker positions come from the same `projection`.
#[derive(Debug, Clone)]
pub struct RenderedMap<'m, T> {
    pub projection: MercatorProjection,
    pub size: Vec2,
    pub features: Arc<[ProjectedFeature]>,
    pub markers: Vec<PlacedMarker<'m, T>>,
}

impl<'m, T> RenderedMap<'m, T> {
    /// Paints land outlines, then markers on top, at `origin` on screen.
    pub fn paint(
        &self,
        painter: &Painter,
        origin: Pos2,
        hovered: Option<HoverTarget>,
        marker_radius: f32,
        style: &MapStyle,
    ) {
        paint_land(
            painter,
            origin,
            self.features.iter().map(|f| {
                let is_hovered = hovered == Some(HoverTarget::Feature { index: f.index });
                (&f.path, is_hovered)
            }),
            style,
        );

        paint_markers(
            painter,
            origin,
            self.markers.iter().map(|m| {
                let is_hovered = hovered == Some(HoverTarget::Marker { index: m.index });
                (m.position, is_hovered)
            }),
            marker_radius,
            style,
        );
    }
}

/// Renders land features and markers for a canvas of `size`.
///
/// Features named in `excluded` are dropped; `Marker::Absent` entries are
/// skipped. Both output sequences keep input order.
pub fn render_world_map<'m, T>(
    features: &[LandFeature],
    excluded: &RegionExclusions,
    size: Vec2,
    params: ProjectionParams,
    markers: &'m [Marker<T>],
) -> RenderedMap<'m, T> {
    check_canvas_size(size);

    let projection = params.projection_for(size);
    let features = project_features(features, excluded, &projection);
    let markers = place_markers(markers, &projection);

    RenderedMap {
        projection,
        size,
        features: features.into(),
        markers,
    }
}

/// Filters out excluded regions and projects the remaining outlines.
pub fn project_features(
    features: &[LandFeature],
    excluded: &RegionExclusions,
    projection: &MercatorProjection,
) -> Vec<ProjectedFeature> {
    for name in excluded.names() {
        if !features.iter().any(|f| f.name == name) {
            log::debug!("Hidden region {:?} not present in dataset", name);
        }
    }

    features
        .iter()
        .enumerate()
        .filter(|(_, feature)| !excluded.contains(&feature.name))
        .map(|(index, feature)| ProjectedFeature {
            index,
            name: feature.name.clone(),
            path: MapPath::from_multi_polygon(&feature.geometry, projection),
        })
        .collect()
}

/// Projects every present marker with `projection`.
pub fn place_markers<'m, T>(
    markers: &'m [Marker<T>],
    projection: &MercatorProjection,
) -> Vec<PlacedMarker<'m, T>> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(index, marker)| match marker {
            Marker::Present { coord, data } => Some(PlacedMarker {
                index,
                data,
                position: projection.geo_to_screen(*coord),
            }),
            Marker::Absent => None,
        })
        .collect()
}

pub(crate) fn check_canvas_size(size: Vec2) {
    if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
        log::warn!("Rendering world map on a degenerate canvas: {:?}", size);
    }
}
