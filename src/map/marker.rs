//! Point overlays placed on the map through the active projection.

use eframe::egui::Pos2;
use geo_types::Coord;

/// An optional marker supplied by the caller for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker<T> {
    /// A marker at a geographic coordinate (lon, lat) with caller metadata
    Present { coord: Coord<f64>, data: T },
    /// Nothing to draw
    Absent,
}

impl<T> Marker<T> {
    pub fn new(lon: f64, lat: f64, data: T) -> Self {
        Marker::Present {
            coord: Coord { x: lon, y: lat },
            data,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Marker::Present { .. })
    }
}

/// Types that know their own map location.
pub trait Located {
    /// Geographic coordinate as (lon, lat).
    fn coord(&self) -> Coord<f64>;
}

impl<T: Located> From<Option<T>> for Marker<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(data) => Marker::Present {
                coord: data.coord(),
                data,
            },
            None => Marker::Absent,
        }
    }
}

/// A marker resolved to a canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedMarker<'m, T> {
    /// Position of the marker in the caller's input list
    pub index: usize,
    pub data: &'m T,
    pub position: Pos2,
}
