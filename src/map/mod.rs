//! Validator world map rendering.
//!
//! This module turns a land dataset and a list of validator markers into
//! projected outlines and pin positions, memoizes the expensive projection
//! step, and reports pointer hover transitions back to the caller.

mod cache;
mod exclusions;
mod hover;
mod marker;
mod render;

pub use cache::{MapRenderCache, RenderCacheKey};
pub use exclusions::{RegionExclusions, DEFAULT_HIDDEN_REGION};
pub use hover::{HoverEvent, HoverTarget, HoverTracker, MapHoverHandler};
pub use marker::{Located, Marker, PlacedMarker};
pub use render::{
    place_markers, project_features, render_world_map, ProjectedFeature, ProjectionParams,
    RenderedMap,
};
