use eframe::egui;

use crate::state::AppState;
use crate::ui::{export, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyFitApp {
    pub state: AppState,
}

impl RustyFitApp {
    /// Cut the plot out of a finished screenshot and write it to disk.
    fn finish_export(&mut self, ctx: &egui::Context) {
        if self.state.pending_export.is_none() {
            return;
        }
        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let (Some(image), Some(pending)) = (screenshot, self.state.pending_export.take()) else {
            return;
        };

        let region = image.region(&pending.rect, Some(ctx.pixels_per_point()));
        match export::save_png(&region, &pending.path) {
            Ok(()) => {
                self.state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to save plot: {e:#}");
                self.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for RustyFitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.finish_export(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: input file, columns, function ----
        egui::SidePanel::left("input_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
            });

        // Observers fired during this frame's widget events.
        self.state.process_dataset_events();

        // ---- Central panel: plot tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::plot_tabs(ui, &mut self.state);
        });
    }
}
