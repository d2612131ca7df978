//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and
//! canvas coordinates using a fixed-parameter Mercator projection.

use eframe::egui::{Pos2, Vec2};
use geo_types::Coord;
use std::f64::consts::FRAC_PI_4;

/// Scale used by the validator world map.
pub const DEFAULT_SCALE: f64 = 105.0;

/// Downward shift of the projection center, in canvas pixels.
pub const DEFAULT_VERTICAL_BIAS: f64 = 20.0;

/// Latitude limit of the projection. Beyond this the Mercator y diverges.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Mercator projection for converting geographic to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    /// Pixels per radian of longitude
    pub scale: f64,
    /// Canvas position of (0°, 0°)
    pub translate: (f64, f64),
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            translate: (0.0, 0.0),
        }
    }
}

impl MercatorProjection {
    /// Creates a projection with an explicit scale and translation.
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        Self { scale, translate }
    }

    /// Creates the projection for a canvas of the given size.
    ///
    /// The origin is placed at the canvas center, pushed down by
    /// `vertical_bias` pixels.
    pub fn for_canvas(size: Vec2, scale: f64, vertical_bias: f64) -> Self {
        let width = size.x as f64;
        let height = size.y as f64;
        Self::new(scale, (width / 2.0, height / 2.0 + vertical_bias))
    }

    /// Projects a raw (lon, lat) pair in degrees, returning f64 canvas coordinates.
    ///
    /// Longitude is not wrapped here so that unwrapped antimeridian rings
    /// keep their continuity.
    pub fn project_raw(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = lon.to_radians();
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = self.translate.0 + self.scale * lambda;
        let y = self.translate.1 - self.scale * (FRAC_PI_4 + phi / 2.0).tan().ln();
        (x, y)
    }

    /// Converts geographic coordinates (lon, lat) to a canvas position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let (x, y) = self.project_raw(wrap_longitude(coord.x), coord.y);
        Pos2::new(x as f32, y as f32)
    }

    /// Converts a canvas position back to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let lambda = (pos.x as f64 - self.translate.0) / self.scale;
        let t = (self.translate.1 - pos.y as f64) / self.scale;
        let phi = 2.0 * t.exp().atan() - std::f64::consts::FRAC_PI_2;

        Coord {
            x: lambda.to_degrees(),
            y: phi.to_degrees(),
        }
    }

    /// Canvas width covered by one full turn of longitude.
    pub fn world_width(&self) -> f64 {
        self.scale * std::f64::consts::TAU
    }
}

/// Wraps a longitude in degrees into [-180, 180].
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
