//! UI modules for the Validator Map application.
//!
//! The UI is split into two panels:
//! - Top bar: Title and load status
//! - Central canvas: World map with validator pins

mod canvas;
mod top_bar;

pub use canvas::render_canvas;
pub use top_bar::render_top_bar;
