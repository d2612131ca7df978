//! Projected drawable paths for land features.

use super::MercatorProjection;
use eframe::egui::{Pos2, Rect};
use geo_types::{LineString, MultiPolygon};
use std::fmt::Write as _;

/// A projected feature outline: a set of closed subpaths in canvas space.
///
/// Exterior rings and holes are both stored as subpaths; filling uses the
/// even-odd rule so holes stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPath {
    subpaths: Vec<Vec<Pos2>>,
}

impl MapPath {
    /// Projects every ring of a multipolygon into a drawable path.
    pub fn from_multi_polygon(geometry: &MultiPolygon<f64>, projection: &MercatorProjection) -> Self {
        let mut path = Self::default();

        for polygon in geometry.iter() {
            path.push_ring(polygon.exterior(), projection);
            for hole in polygon.interiors() {
                path.push_ring(hole, projection);
            }
        }

        path
    }

    fn push_ring(&mut self, ring: &LineString<f64>, projection: &MercatorProjection) {
        let mut lons: Vec<f64> = Vec::with_capacity(ring.0.len());
        let mut crosses_antimeridian = false;

        // Unwrap longitudes so consecutive steps never exceed half a turn
        for coord in ring.coords() {
            let lon = match lons.last() {
                Some(&prev) => {
                    let mut lon = coord.x;
                    while lon - prev > 180.0 {
                        lon -= 360.0;
                        crosses_antimeridian = true;
                    }
                    while lon - prev < -180.0 {
                        lon += 360.0;
                        crosses_antimeridian = true;
                    }
                    lon
                }
                None => coord.x,
            };
            lons.push(lon);
        }

        let project = |shift: f64| -> Vec<Pos2> {
            lons.iter()
                .zip(ring.coords())
                .map(|(lon, coord)| {
                    let (x, y) = projection.project_raw(lon + shift, coord.y);
                    Pos2::new(x as f32, y as f32)
                })
                .collect()
        };

        self.push_points(project(0.0));

        if crosses_antimeridian {
            let (min_lon, max_lon) = lons
                .iter()
                .fold((f64::MAX, f64::MIN), |(lo, hi), &l| (lo.min(l), hi.max(l)));
            if max_lon > 180.0 {
                self.push_points(project(-360.0));
            }
            if min_lon < -180.0 {
                self.push_points(project(360.0));
            }
        }
    }

    fn push_points(&mut self, mut points: Vec<Pos2>) {
        // Closing point is implicit
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points.dedup();

        if distinct_points(&points) >= 3 {
            self.subpaths.push(points);
        }
    }

    /// Closed subpaths of this path, in canvas coordinates.
    pub fn subpaths(&self) -> &[Vec<Pos2>] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Canvas bounding rectangle of all subpaths.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.subpaths.iter().flatten();
        let first = *points.next()?;
        Some(points.fold(Rect::from_min_max(first, first), |rect, p| {
            rect.union(Rect::from_min_max(*p, *p))
        }))
    }

    /// Even-odd point-in-path test across every subpath.
    pub fn contains(&self, point: Pos2) -> bool {
        match self.bounds() {
            Some(bounds) if bounds.contains(point) => {}
            _ => return false,
        }

        let mut inside = false;
        for ring in &self.subpaths {
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let (a, b) = (ring[i], ring[j]);
                if (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    /// Renders the path as SVG path data (`M x,y L x,y ... Z`).
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for ring in &self.subpaths {
            for (i, p) in ring.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                let _ = write!(out, "{}{},{}", command, fmt_number(p.x), fmt_number(p.y));
            }
            out.push('Z');
        }
        out
    }
}

/// Number of distinct positions in a ring, wherever the repeats occur.
fn distinct_points(points: &[Pos2]) -> usize {
    let mut keys: Vec<(u32, u32)> = points.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn fmt_number(value: f32) -> String {
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
