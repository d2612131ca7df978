//! Top bar: title and status.

use crate::state::AppState;
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Validator Map");
            ui.separator();
            ui.label(
                RichText::new(&state.status_message)
                    .size(12.0)
                    .color(Color32::from_rgb(160, 160, 180)),
            );
        });
    });
}
