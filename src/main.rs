//! Mdnotes - markdown note manager
//!
//! Notes live in a local key-value store; the UI lists, edits and previews
//! them and follows the light/dark/system theme preference.

mod app;
mod core;
mod ui;

use app::MdnotesApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Mdnotes...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Mdnotes")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Mdnotes",
        native_options,
        Box::new(|cc| Ok(Box::new(MdnotesApp::new(cc)?))),
    )
}
