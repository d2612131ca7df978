//! World map configuration.
//!
//! Settings are read from a JSON file; every field is optional and falls
//! back to the defaults used by the validator map.

use crate::geo::{DEFAULT_SCALE, DEFAULT_VERTICAL_BIAS};
use crate::map::{ProjectionParams, RegionExclusions, DEFAULT_HIDDEN_REGION};
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Colors used to draw the map, as RGBA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub background: [u8; 4],
    pub land_stroke: [u8; 4],
    pub land_hover_stroke: [u8; 4],
    pub marker_fill: [u8; 4],
    pub marker_stroke: [u8; 4],
    pub marker_hover_fill: [u8; 4],
    /// Outline width of land features in pixels
    pub land_stroke_width: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: [20, 20, 35, 255],
            land_stroke: [100, 100, 120, 255],
            land_hover_stroke: [170, 170, 200, 255],
            marker_fill: [50, 200, 255, 220],
            marker_stroke: [30, 150, 200, 255],
            marker_hover_fill: [255, 180, 80, 255],
            land_stroke_width: 1.0,
        }
    }
}

impl MapStyle {
    pub fn color(rgba: [u8; 4]) -> Color32 {
        Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// Top-level configuration for the world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Mercator scale (pixels per radian)
    pub scale: f64,
    /// Downward shift of the map center in pixels
    pub vertical_bias: f64,
    /// Region names removed before rendering
    pub hidden_regions: Vec<String>,
    /// Object to read from a TopoJSON dataset
    pub topology_object: String,
    /// Land dataset path; the embedded coarse world map is used when unset
    pub dataset: Option<PathBuf>,
    /// Validator list path; sample validators are used when unset
    pub validators: Option<PathBuf>,
    /// Marker radius in pixels, also the hover hit radius
    pub marker_radius: f32,
    pub style: MapStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            vertical_bias: DEFAULT_VERTICAL_BIAS,
            hidden_regions: vec![DEFAULT_HIDDEN_REGION.to_string()],
            topology_object: "countries".to_string(),
            dataset: None,
            validators: None,
            marker_radius: 4.0,
            style: MapStyle::default(),
        }
    }
}

impl MapConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded map config from {}", path.display());
        Ok(config)
    }

    /// Loads a configuration file if given, falling back to defaults on error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load map config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            scale: self.scale,
            vertical_bias: self.vertical_bias,
        }
    }

    pub fn exclusions(&self) -> RegionExclusions {
        RegionExclusions::from_names(self.hidden_regions.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MapConfig::from_json("{}").unwrap();

        assert_eq!(config, MapConfig::default());
        assert_eq!(config.projection_params(), ProjectionParams::default());
        assert!(config.exclusions().contains("Antarctica"));
    }

    #[test]
    fn test_partial_config() {
        let config = MapConfig::from_json(
            r#"{ "scale": 150, "hidden_regions": [], "style": { "land_stroke_width": 2.5 } }"#,
        )
        .unwrap();

        assert_eq!(config.scale, 150.0);
        assert_eq!(config.vertical_bias, 20.0);
        assert!(config.exclusions().is_empty());
        assert_eq!(config.style.land_stroke_width, 2.5);
        assert_eq!(config.style.background, MapStyle::default().background);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            MapConfig::from_json(r#"{ "scale": "big" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = MapConfig::load_or_default(Some(Path::new("/nonexistent/map.json")));
        assert_eq!(config, MapConfig::default());
    }
}
