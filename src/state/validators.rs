//! Validator locations shown as map pins.

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator_map::config::ConfigError;
use validator_map::map::{Located, Marker};

/// A validator with a known geographic location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorLocation {
    pub name: String,
    /// ISO 3166 alpha-2 code of the hosting country
    #[serde(default)]
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub voting_power: Option<f64>,
}

impl Located for ValidatorLocation {
    fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Parses a JSON array of validators; `null` entries become absent markers.
pub fn parse_validators(json: &str) -> Result<Vec<Marker<ValidatorLocation>>, ConfigError> {
    let entries: Vec<Option<ValidatorLocation>> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(Marker::from).collect())
}

/// Loads validators from a file, falling back to the sample set on error.
pub fn load_validators(path: Option<&Path>) -> Vec<Marker<ValidatorLocation>> {
    let Some(path) = path else {
        return sample_validators();
    };

    let result = std::fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|json| parse_validators(&json));

    match result {
        Ok(markers) => {
            log::info!("Loaded {} validators from {}", markers.len(), path.display());
            markers
        }
        Err(e) => {
            log::warn!("Failed to load validators {}: {}", path.display(), e);
            sample_validators()
        }
    }
}

/// A small fixed set of validator locations for the demo map.
pub fn sample_validators() -> Vec<Marker<ValidatorLocation>> {
    let sites: [(&str, &str, f64, f64); 10] = [
        ("validator-nyc", "US", 40.71, -74.01),
        ("validator-sfo", "US", 37.77, -122.42),
        ("validator-yyz", "CA", 43.65, -79.38),
        ("validator-gru", "BR", -23.55, -46.63),
        ("validator-par", "FR", 48.86, 2.35),
        ("validator-fra", "DE", 50.11, 8.68),
        ("validator-lon", "GB", 51.51, -0.13),
        ("validator-sin", "SG", 1.35, 103.82),
        ("validator-tyo", "JP", 35.68, 139.69),
        ("validator-syd", "AU", -33.87, 151.21),
    ];

    let mut markers: Vec<Marker<ValidatorLocation>> = sites
        .iter()
        .map(|&(name, country, latitude, longitude)| {
            Some(ValidatorLocation {
                name: name.to_string(),
                country_code: Some(country.to_string()),
                latitude,
                longitude,
                voting_power: None,
            })
            .into()
        })
        .collect();

    // Validators without a resolved location
    markers.push(Marker::Absent);
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_entries_become_absent() {
        let json = r#"[
            { "name": "a", "country_code": "FR", "latitude": 48.8, "longitude": 2.3 },
            null,
            { "name": "b", "latitude": -33.9, "longitude": 151.2, "voting_power": 12.5 }
        ]"#;
        let markers = parse_validators(json).unwrap();

        assert_eq!(markers.len(), 3);
        assert!(markers[0].is_present());
        assert_eq!(markers[1], Marker::Absent);
        match &markers[2] {
            Marker::Present { coord, data } => {
                assert_eq!(*coord, Coord { x: 151.2, y: -33.9 });
                assert_eq!(data.voting_power, Some(12.5));
                assert_eq!(data.country_code, None);
            }
            Marker::Absent => panic!("expected a present marker"),
        }
    }

    #[test]
    fn test_missing_file_uses_samples() {
        let markers = load_validators(Some(Path::new("/nonexistent/validators.json")));
        assert_eq!(markers, sample_validators());
    }

    #[test]
    fn test_samples_include_an_absent_entry() {
        let markers = sample_validators();
        assert!(markers.iter().any(|m| !m.is_present()));
        assert!(markers.iter().filter(|m| m.is_present()).count() >= 10);
    }
}
