//! Central canvas UI: world map with validator pins.

use crate::state::{AppState, HoverInfo, ValidatorLocation};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, RichText, Sense, Vec2};
use validator_map::config::MapStyle;
use validator_map::map::{HoverTarget, HoverTracker, MapRenderCache};

/// Render the world map and forward pointer hover to the app state.
pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    cache: &mut MapRenderCache,
    tracker: &mut HoverTracker,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();

        // Allocate the full available space for the canvas
        let (response, painter) = ui.allocate_painter(available_size, Sense::hover());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, MapStyle::color(state.config.style.background));

        let map = cache.render(
            &state.dataset,
            &state.exclusions,
            rect.size(),
            state.config.projection_params(),
            &state.validators,
        );

        // Pointer in canvas-local coordinates
        let pointer = response.hover_pos().map(|p| (p - rect.min).to_pos2());

        tracker.sync_features(&state.dataset, &state.exclusions, &mut state.hover);
        tracker.track(
            &map,
            pointer,
            state.config.marker_radius,
            |validator: &ValidatorLocation| validator.country_code.clone(),
            &mut state.hover,
        );

        map.paint(
            &painter,
            rect.min,
            tracker.current(),
            state.config.marker_radius,
            &state.config.style,
        );

        if let Some(local) = pointer {
            let coord = map.projection.screen_to_geo(local);
            draw_overlay_info(ui, &rect, coord.x, coord.y);
        }

        if let Some(info) = &state.hover.current {
            if let Some(pos) = response.hover_pos() {
                draw_tooltip(&painter, pos, &tooltip_text(state, info));
            }
        }
    });
}

fn tooltip_text(state: &AppState, info: &HoverInfo) -> String {
    match info.target {
        HoverTarget::Marker { index } => match state.validator(index) {
            Some(validator) => {
                let mut text = validator.name.clone();
                if let Some(country) = &info.region {
                    text.push_str(&format!(" ({})", country));
                }
                if let Some(power) = validator.voting_power {
                    text.push_str(&format!("\nVoting power: {:.2}", power));
                }
                text
            }
            None => "Unknown validator".to_string(),
        },
        HoverTarget::Feature { .. } => info.region.clone().unwrap_or_default(),
    }
}

fn draw_tooltip(painter: &Painter, pointer: Pos2, text: &str) {
    if text.is_empty() {
        return;
    }

    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(12.0),
        Color32::from_rgb(220, 220, 240),
    );
    let anchor = pointer + Vec2::new(12.0, 12.0);
    let background = Rect::from_min_size(anchor, galley.size()).expand(4.0);

    painter.rect_filled(background, 3.0, Color32::from_rgba_unmultiplied(10, 10, 20, 220));
    painter.galley(anchor, galley, Color32::WHITE);
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, lon: f64, lat: f64) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(160.0, 40.0));

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!("Lon: {:>8.3}", lon))
                    .monospace()
                    .size(12.0)
                    .color(Color32::from_rgb(200, 200, 220)),
            );
            ui.label(
                RichText::new(format!("Lat: {:>8.3}", lat))
                    .monospace()
                    .size(12.0)
                    .color(Color32::from_rgb(200, 200, 220)),
            );
        });
    });
}
