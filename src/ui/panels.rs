use eframe::egui::{self, Color32, RichText, Ui};

use super::dialogs::{Dialogs, NativeDialogs};
use crate::consts::NO_VALUE;
use crate::data::fitting::{self, CATALOG};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input file, columns, fitting function
// ---------------------------------------------------------------------------

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Input");
    ui.separator();
    state.input.ui(ui, &NativeDialogs);

    ui.add_space(8.0);
    ui.heading("Columns");
    ui.separator();
    column_selectors(ui, state);

    ui.add_space(8.0);
    ui.heading("Fitting function");
    ui.separator();
    function_selector(ui, state);
}

fn column_selectors(ui: &mut Ui, state: &mut AppState) {
    // Clone what we need so we can mutate state below.
    let (columns, x_column, y_column) = {
        let session = state.session.borrow();
        let Some(data) = &session.data else {
            ui.label("No dataset loaded.");
            return;
        };
        (
            data.dataset()
                .column_names()
                .map(str::to_string)
                .collect::<Vec<_>>(),
            data.x_column().to_string(),
            data.y_column().to_string(),
        )
    };

    if let Some(col) = column_combo(ui, "x_column", "X column:", &columns, &x_column) {
        state.set_x_column(&col);
    }
    if let Some(col) = column_combo(ui, "y_column", "Y column:", &columns, &y_column) {
        state.set_y_column(&col);
    }
}

fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    current: &str,
) -> Option<String> {
    let mut chosen = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    if ui.selectable_label(col == current, col).clicked() && col != current {
                        chosen = Some(col.clone());
                    }
                }
            });
    });
    chosen
}

fn function_selector(ui: &mut Ui, state: &mut AppState) {
    let current = state.session.borrow().function;
    let current_name = current.map_or(NO_VALUE, |f| f.title_name);

    let mut chosen = None;
    egui::ComboBox::from_id_salt("fitting_function")
        .selected_text(current_name)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), NO_VALUE).clicked() {
                chosen = Some(None);
            }
            for function in CATALOG {
                let selected = current.is_some_and(|f| f.name == function.name);
                if ui.selectable_label(selected, function.title_name).clicked() {
                    chosen = Some(Some(*function));
                }
            }
        });
    if let Some(function) = chosen {
        log::info!(
            "Fitting function: {}",
            function.map_or(NO_VALUE, |f| f.title_name)
        );
        state.set_function(function);
    }

    let Some(function) = current else {
        return;
    };
    ui.label(RichText::new(format!("y = {}", function.syntax)).monospace());
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Parameters:");
        let mut text = state.parameters_text.clone();
        if ui.text_edit_singleline(&mut text).changed() {
            state.set_parameters_text(text);
        }
    });
    let count = fitting::parse_parameters(&state.parameters_text)
        .map(|p| p.len())
        .unwrap_or(0);
    if count != function.n_parameters {
        ui.label(
            RichText::new(format!(
                "{} expects {} parameters",
                function.title_name, function.n_parameters
            ))
            .color(Color32::YELLOW),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                state.input.select_file(&NativeDialogs);
                ui.close_menu();
            }
            if ui.button("Save plot…").clicked() {
                request_export(ui.ctx(), state, &NativeDialogs);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.input.file_path().and_then(|p| p.file_name()) {
            ui.label(format!(
                "{} [{}]",
                name.to_string_lossy(),
                state.input.selected_sheet()
            ));
        }

        if let Some(data) = &state.session.borrow().data {
            ui.label(format!(
                "{} records, {} vs {}",
                data.dataset().len(),
                data.y_column(),
                data.x_column()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Plot export
// ---------------------------------------------------------------------------

/// Ask where to save the active plot and request a screenshot to cut it from.
pub fn request_export(ctx: &egui::Context, state: &mut AppState, dialogs: &dyn Dialogs) {
    let config = state.config(state.active_tab);
    let file_name = config.file_name();
    match config.get_plot_kwargs() {
        Ok(kwargs) => match serde_json::to_string(&kwargs) {
            Ok(json) => log::debug!("Exporting plot with {json}"),
            Err(e) => log::warn!("Cannot serialize plot settings: {e}"),
        },
        Err(e) => {
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    }

    let Some(rect) = state.plot_rect else {
        state.status_message = Some("Error: nothing to save yet".to_string());
        return;
    };
    let Some(path) = dialogs.save_file_dialog("Save plot", &file_name) else {
        return;
    };
    state.pending_export = Some(crate::state::PendingExport { path, rect });
    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
}
