mod analysis;
mod app;
mod color;
mod data;
mod physics;
mod state;
mod ui;

use app::OpticsLabApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    log::info!("Starting Optics Lab");
    eframe::run_native(
        "Optics Lab",
        options,
        Box::new(|_cc| Ok(Box::new(OpticsLabApp::default()))),
    )
}
