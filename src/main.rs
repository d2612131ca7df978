#![warn(clippy::all)]

//! Validator Map - a world map of validator locations.
//!
//! This application draws land boundaries with a Mercator projection, pins
//! every validator with a known location, and shows the hovered validator or
//! region in a tooltip.

mod state;
mod ui;

use eframe::egui;
use state::AppState;
use validator_map::config::MapConfig;
use validator_map::map::{HoverTracker, MapRenderCache};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = MapConfig::load_or_default(config_path.as_deref());

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Validator Map",
        native_options,
        Box::new(|cc| Ok(Box::new(ValidatorMapApp::new(cc, config)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ValidatorMapApp::new(cc, MapConfig::default())))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct ValidatorMapApp {
    /// Application state containing map data and hover details
    state: AppState,

    /// Projected land outlines from the previous frame
    render_cache: MapRenderCache,

    /// Turns pointer hits into hover enter/leave notifications
    hover_tracker: HoverTracker,
}

impl ValidatorMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: MapConfig) -> Self {
        let state = AppState::new(config);
        log::info!("{}", state.status_message);

        Self {
            state,
            render_cache: MapRenderCache::new(),
            hover_tracker: HoverTracker::new(),
        }
    }
}

impl eframe::App for ValidatorMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::render_top_bar(ctx, &self.state);
        ui::render_canvas(
            ctx,
            &mut self.state,
            &mut self.render_cache,
            &mut self.hover_tracker,
        );
    }
}
