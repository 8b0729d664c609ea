use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::consts::PREVIEW_ROWS;
use crate::plot::ticks::relevant_precision_string;
use crate::state::{AppState, PlotTab};

// ---------------------------------------------------------------------------
// Central panel – plot tabs
// ---------------------------------------------------------------------------

/// Render the tab strip, the active tab's configuration and its plot.
pub fn plot_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in PlotTab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
    ui.separator();

    let tab = state.active_tab;
    egui::CollapsingHeader::new(RichText::new("Plot configuration").strong())
        .id_salt(("plot_config", tab.label()))
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            state.config_mut(tab).ui(ui);
        });

    if tab == PlotTab::Data {
        egui::CollapsingHeader::new(RichText::new("Data preview").strong())
            .id_salt("data_preview")
            .default_open(false)
            .show(ui, |ui: &mut Ui| data_preview(ui, state));
    }
    ui.separator();

    if state.session.borrow().data.is_none() {
        state.plot_rect = None;
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Choose an input file and sheet to plot  (File → Open…)");
        });
        return;
    }

    match state.config(tab).on_draw(tab.figure_id()) {
        Ok(figure) => {
            let response = figure.show(ui);
            state.plot_rect = Some(response.rect);
        }
        Err(e) => {
            state.plot_rect = None;
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }
}

fn data_preview(ui: &mut Ui, state: &AppState) {
    let session = state.session.borrow();
    let Some(data) = &session.data else {
        return;
    };
    let dataset = data.dataset();
    if dataset.is_empty() {
        ui.label("No records.");
        return;
    }
    let names: Vec<&str> = dataset.column_names().collect();
    let columns: Vec<&[f64]> = names.iter().filter_map(|n| dataset.column(n)).collect();
    let rows = dataset.len().min(PREVIEW_ROWS);

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(200.0)
            .columns(Column::auto().at_least(60.0), names.len())
            .header(20.0, |mut header| {
                for name in &names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows, |mut row| {
                    let index = row.index();
                    for column in &columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(relevant_precision_string(column[index]));
                        });
                    }
                });
            });
    });
    if dataset.len() > rows {
        ui.label(format!("… {} more records", dataset.len() - rows));
    }
}
