//! Pointer hit-testing and hover notifications.

use super::{RegionExclusions, RenderedMap};
use crate::geo::LandDataset;
use eframe::egui::Pos2;

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    /// A land feature, by dataset index
    Feature { index: usize },
    /// A marker, by index in the caller's marker list
    Marker { index: usize },
}

/// Pointer details passed along with a hover notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverEvent {
    /// Pointer position in canvas coordinates
    pub pointer: Pos2,
    pub target: HoverTarget,
}

/// Receives hover notifications from the map.
pub trait MapHoverHandler {
    /// The pointer entered a drawn feature or marker.
    fn on_feature_hover(&mut self, event: &HoverEvent, region: Option<&str>);

    /// The pointer left the previously hovered feature or marker.
    fn on_hover_end(&mut self);
}

impl<'m, T> RenderedMap<'m, T> {
    /// Returns the topmost target under `pointer` (canvas coordinates).
    ///
    /// Markers are drawn over land, so they win; within each group the
    /// last drawn entry wins.
    pub fn hit_test(&self, pointer: Pos2, marker_radius: f32) -> Option<HoverTarget> {
        let radius_sq = marker_radius * marker_radius;
        if let Some(marker) = self
            .markers
            .iter()
            .rev()
            .find(|m| m.position.distance_sq(pointer) <= radius_sq)
        {
            return Some(HoverTarget::Marker {
                index: marker.index,
            });
        }

        self.features
            .iter()
            .rev()
            .find(|f| f.path.contains(pointer))
            .map(|f| HoverTarget::Feature { index: f.index })
    }

    /// Resolves the region identifier reported for a target.
    ///
    /// Features report their name; markers report whatever `marker_region`
    /// returns for their data.
    pub fn region_of<F>(&self, target: HoverTarget, marker_region: F) -> Option<String>
    where
        F: Fn(&T) -> Option<String>,
    {
        match target {
            HoverTarget::Feature { index } => self
                .features
                .iter()
                .find(|f| f.index == index)
                .map(|f| f.name.clone()),
            HoverTarget::Marker { index } => self
                .markers
                .iter()
                .find(|m| m.index == index)
                .and_then(|m| marker_region(m.data)),
        }
    }
}

/// Turns per-frame hit results into enter/leave notifications.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<HoverTarget>,
    /// Dataset and exclusion signatures the feature indices refer to
    features: Option<(u64, u64)>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered target, if any.
    pub fn current(&self) -> Option<HoverTarget> {
        self.current
    }

    /// Feeds the target under the pointer for this frame.
    ///
    /// Fires `on_hover_end` when the previous target is left and
    /// `on_feature_hover` when a new one is entered.
    pub fn update<H: MapHoverHandler>(
        &mut self,
        pointer: Option<Pos2>,
        target: Option<HoverTarget>,
        region: Option<&str>,
        handler: &mut H,
    ) {
        let target = pointer.and(target);
        if target == self.current {
            return;
        }

        if self.current.is_some() {
            handler.on_hover_end();
        }

        if let (Some(pointer), Some(target)) = (pointer, target) {
            handler.on_feature_hover(&HoverEvent { pointer, target }, region);
        }

        self.current = target;
    }

    /// Ends the current hover, if any, without waiting for the pointer.
    pub fn reset<H: MapHoverHandler>(&mut self, handler: &mut H) {
        if self.current.take().is_some() {
            handler.on_hover_end();
        }
    }

    /// Resets the hover when the rendered feature list changes.
    ///
    /// Feature indices are positions in the filtered dataset, so a new
    /// dataset or exclusion set can put a different region behind the same
    /// index.
    pub fn sync_features<H: MapHoverHandler>(
        &mut self,
        dataset: &LandDataset,
        excluded: &RegionExclusions,
        handler: &mut H,
    ) {
        let features = (dataset.signature(), excluded.signature());
        if self.features.replace(features).is_some_and(|prev| prev != features) {
            log::debug!("Land features changed, ending hover");
            self.reset(handler);
        }
    }

    /// Hit-tests `map` at `pointer` and forwards the result to `update`.
    pub fn track<T, F, H>(
        &mut self,
        map: &RenderedMap<'_, T>,
        pointer: Option<Pos2>,
        marker_radius: f32,
        marker_region: F,
        handler: &mut H,
    ) where
        F: Fn(&T) -> Option<String>,
        H: MapHoverHandler,
    {
        let target = pointer.and_then(|p| map.hit_test(p, marker_radius));
        let region = target.and_then(|t| map.region_of(t, marker_region));
        self.update(pointer, target, region.as_deref(), handler);
    }
}
