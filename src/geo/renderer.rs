//! Map rendering.
//!
//! Paints projected outlines and marker pins onto the egui canvas. Inputs
//! are in canvas-local coordinates; `origin` is the top-left corner of the
//! canvas on screen.

use super::MapPath;
use crate::config::MapStyle;
use eframe::egui::{Painter, Pos2, Shape, Stroke};

/// Renders land outlines, highlighting the hovered one.
///
/// Outlines only: concave fills would require tessellation.
pub fn paint_land<'a>(
    painter: &Painter,
    origin: Pos2,
    paths: impl Iterator<Item = (&'a MapPath, bool)>,
    style: &MapStyle,
) {
    let stroke = Stroke::new(style.land_stroke_width, MapStyle::color(style.land_stroke));
    let hover_stroke = Stroke::new(
        style.land_stroke_width * 2.0,
        MapStyle::color(style.land_hover_stroke),
    );

    let mut hovered: Vec<&MapPath> = Vec::new();
    for (path, is_hovered) in paths {
        if is_hovered {
            // Drawn last so the highlight sits on top of neighbours
            hovered.push(path);
        } else {
            paint_path(painter, origin, path, stroke);
        }
    }

    for path in hovered {
        paint_path(painter, origin, path, hover_stroke);
    }
}

fn paint_path(painter: &Painter, origin: Pos2, path: &MapPath, stroke: Stroke) {
    let offset = origin.to_vec2();
    for ring in path.subpaths() {
        let points: Vec<Pos2> = ring.iter().map(|p| *p + offset).collect();
        painter.add(Shape::closed_line(points, stroke));
    }
}

/// Renders marker pins, the hovered one enlarged.
pub fn paint_markers(
    painter: &Painter,
    origin: Pos2,
    positions: impl Iterator<Item = (Pos2, bool)>,
    radius: f32,
    style: &MapStyle,
) {
    let offset = origin.to_vec2();
    let fill = MapStyle::color(style.marker_fill);
    let hover_fill = MapStyle::color(style.marker_hover_fill);
    let stroke = Stroke::new(1.0, MapStyle::color(style.marker_stroke));

    for (position, is_hovered) in positions {
        let center = position + offset;
        if is_hovered {
            painter.circle_filled(center, radius * 1.5, hover_fill);
            painter.circle_stroke(center, radius * 1.5, stroke);
        } else {
            painter.circle_filled(center, radius, fill);
            painter.circle_stroke(center, radius, stroke);
        }
    }
}
