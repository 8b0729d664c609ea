mod app;
mod color;
mod consts;
mod data;
mod plot;
mod state;
mod ui;

use app::RustyFitApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(consts::WINDOW_SIZE)
            .with_min_inner_size(consts::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Fit – Curve Fitting",
        options,
        Box::new(|_cc| Ok(Box::new(RustyFitApp::default()))),
    )
}
