//! Application state management.
//!
//! Holds the loaded map data, the validator list, and what the pointer is
//! currently hovering over.

pub mod validators;

use validator_map::config::MapConfig;
use validator_map::geo::{self, LandDataset};
use validator_map::map::{HoverEvent, HoverTarget, MapHoverHandler, Marker, RegionExclusions};

pub use validators::ValidatorLocation;

/// Details of the currently hovered feature or marker.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub target: HoverTarget,
    /// Region name or country code reported for the target
    pub region: Option<String>,
}

/// Root application state.
pub struct AppState {
    pub config: MapConfig,

    /// Land boundaries drawn on the map
    pub dataset: LandDataset,

    /// Regions removed before rendering
    pub exclusions: RegionExclusions,

    /// Validator pins, including validators without a location
    pub validators: Vec<Marker<ValidatorLocation>>,

    /// Current hover, updated through the hover callbacks
    pub hover: HoverState,

    /// Status message displayed in the top bar
    pub status_message: String,
}

impl AppState {
    pub fn new(config: MapConfig) -> Self {
        let dataset = load_dataset(&config);
        let validators = validators::load_validators(config.validators.as_deref());
        let exclusions = config.exclusions();

        let located = validators.iter().filter(|m| m.is_present()).count();
        let status_message = format!(
            "{} regions, {} of {} validators located",
            dataset.len(),
            located,
            validators.len()
        );

        Self {
            config,
            dataset,
            exclusions,
            validators,
            hover: HoverState::default(),
            status_message,
        }
    }

    /// The validator behind a marker index, if it has a location.
    pub fn validator(&self, index: usize) -> Option<&ValidatorLocation> {
        match self.validators.get(index)? {
            Marker::Present { data, .. } => Some(data),
            Marker::Absent => None,
        }
    }
}

/// Receives hover notifications from the map canvas.
#[derive(Debug, Default)]
pub struct HoverState {
    pub current: Option<HoverInfo>,
}

impl MapHoverHandler for HoverState {
    fn on_feature_hover(&mut self, event: &HoverEvent, region: Option<&str>) {
        log::debug!("Hovering {:?} at {:?} ({:?})", event.target, event.pointer, region);
        self.current = Some(HoverInfo {
            target: event.target,
            region: region.map(str::to_string),
        });
    }

    fn on_hover_end(&mut self) {
        self.current = None;
    }
}

/// Loads the configured dataset, falling back to the embedded world map.
fn load_dataset(config: &MapConfig) -> LandDataset {
    if let Some(path) = &config.dataset {
        match LandDataset::load(path, &config.topology_object) {
            Ok(dataset) if !dataset.is_empty() => return dataset,
            Ok(_) => log::warn!("Dataset {} contains no land features", path.display()),
            Err(e) => log::warn!("Failed to load dataset {}: {}", path.display(), e),
        }
    }

    geo::embedded_world().unwrap_or_else(|e| {
        log::error!("Failed to decode embedded world map: {}", e);
        LandDataset::new(Vec::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Pos2;

    #[test]
    fn test_defaults_load_embedded_world_and_samples() {
        let state = AppState::new(MapConfig::default());

        assert!(!state.dataset.is_empty());
        assert!(state.exclusions.contains("Antarctica"));
        assert!(state.validator(0).is_some());
        assert!(state.validator(state.validators.len() - 1).is_none());
    }

    #[test]
    fn test_missing_dataset_falls_back() {
        let config = MapConfig {
            dataset: Some("/nonexistent/world.topo.json".into()),
            ..Default::default()
        };
        let state = AppState::new(config);

        assert_eq!(
            state.dataset.signature(),
            geo::embedded_world().unwrap().signature()
        );
    }

    #[test]
    fn test_hover_callbacks_update_state() {
        let mut hover = HoverState::default();
        let event = HoverEvent {
            pointer: Pos2::new(3.0, 4.0),
            target: HoverTarget::Marker { index: 2 },
        };

        hover.on_feature_hover(&event, Some("CA"));
        assert_eq!(hover.current.as_ref().unwrap().region.as_deref(), Some("CA"));

        hover.on_hover_end();
        assert!(hover.current.is_none());
    }
}
