use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, Ui};

use super::dialogs::Dialogs;
use crate::consts::NO_VALUE;
use crate::data::loader::{is_spreadsheet, CalamineSource, LoadError, SheetSource};
use crate::data::model::Dataset;

/// Called with the new dataset (or `None`) every time it changes.
pub type DatasetHandler = Box<dyn FnMut(Option<Arc<Dataset>>)>;

// ---------------------------------------------------------------------------
// Input file box – file path, sheet dropdown, parsed dataset
// ---------------------------------------------------------------------------

pub struct InputFileBox {
    file_path: Option<PathBuf>,
    /// Lossy rendering of `file_path` for the read-only text field.
    file_path_text: String,
    sheets_options: Vec<String>,
    sheet_enabled: bool,
    selected_sheet: String,
    dataset: Option<Arc<Dataset>>,
    handlers: Vec<DatasetHandler>,
    source: Box<dyn SheetSource>,
}

impl Default for InputFileBox {
    fn default() -> Self {
        Self::new(Box::new(CalamineSource))
    }
}

impl InputFileBox {
    pub fn new(source: Box<dyn SheetSource>) -> Self {
        Self {
            file_path: None,
            file_path_text: String::new(),
            sheets_options: Vec::new(),
            sheet_enabled: false,
            selected_sheet: NO_VALUE.to_string(),
            dataset: None,
            handlers: Vec::new(),
            source,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn sheets_options(&self) -> &[String] {
        &self.sheets_options
    }

    pub fn sheet_selection_enabled(&self) -> bool {
        self.sheet_enabled
    }

    pub fn selected_sheet(&self) -> &str {
        &self.selected_sheet
    }

    #[cfg(test)]
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    /// Register an observer of dataset changes. Observers run synchronously,
    /// in registration order, once per change.
    pub fn add_handler(&mut self, handler: impl FnMut(Option<Arc<Dataset>>) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// "Choose file" button: ask for a path, then [`Self::load_file`].
    /// Cancelling the dialog changes nothing.
    pub fn select_file(&mut self, dialogs: &dyn Dialogs) {
        let Some(path) = dialogs.open_file_dialog("Choose input file") else {
            log::debug!("File selection cancelled");
            return;
        };
        self.load_file(&path, dialogs);
    }

    /// Take `path` as the input file: list its sheets when it is a
    /// spreadsheet, disable the sheet dropdown otherwise. The dataset is
    /// always cleared until a sheet is chosen.
    pub fn load_file(&mut self, path: &Path, dialogs: &dyn Dialogs) {
        self.file_path = Some(path.to_path_buf());
        self.file_path_text = path.display().to_string();
        self.selected_sheet = NO_VALUE.to_string();

        if is_spreadsheet(path) {
            match self.source.sheet_names(path) {
                Ok(names) => {
                    log::info!("{} has sheets {names:?}", path.display());
                    let options = std::iter::once(NO_VALUE.to_string()).chain(names).collect();
                    self.set_sheets_options(Some(options));
                }
                Err(e) => {
                    log::warn!("Cannot list sheets of {}: {e}", path.display());
                    dialogs.error_dialog("Invalid Input Source", &e.to_string());
                    self.set_sheets_options(None);
                }
            }
        } else {
            self.set_sheets_options(None);
        }
        self.set_dataset(None);
    }

    /// Sheet dropdown selection. The sentinel clears the dataset; a sheet
    /// that fails to parse shows an error dialog and clears it too.
    pub fn select_sheet(&mut self, sheet: &str, dialogs: &dyn Dialogs) {
        self.selected_sheet = sheet.to_string();
        if sheet == NO_VALUE {
            self.set_dataset(None);
            return;
        }

        let Some(path) = self.file_path.clone() else {
            log::warn!("Sheet \"{sheet}\" chosen before any input file");
            self.set_dataset(None);
            return;
        };
        match self.source.read_sheet(&path, sheet) {
            Ok(dataset) => self.set_dataset(Some(Arc::new(dataset))),
            Err(e) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.file_path_text.clone());
                log::warn!("Rejected sheet \"{sheet}\" of {file_name}: {e}");
                let message = match e {
                    LoadError::InvalidData(_) => {
                        format!("\"{sheet}\" sheet in \"{file_name}\" has invalid syntax")
                    }
                    other => format!("Cannot read \"{sheet}\" sheet in \"{file_name}\": {other}"),
                };
                dialogs.error_dialog("Invalid Input Source", &message);
                self.set_dataset(None);
            }
        }
    }

    /// Render the box.
    pub fn ui(&mut self, ui: &mut Ui, dialogs: &dyn Dialogs) {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Input file:");
            let mut path = self.file_path_text.as_str();
            ui.add(egui::TextEdit::singleline(&mut path).desired_width(160.0));
            if ui.button("Choose file").clicked() {
                self.select_file(dialogs);
            }
        });

        let mut chosen: Option<String> = None;
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Sheet:");
            ui.add_enabled_ui(self.sheet_selection_enabled(), |ui: &mut Ui| {
                egui::ComboBox::from_id_salt("sheet_select")
                    .selected_text(self.selected_sheet())
                    .show_ui(ui, |ui: &mut Ui| {
                        for sheet in self.sheets_options() {
                            if ui
                                .selectable_label(sheet == self.selected_sheet(), sheet)
                                .clicked()
                            {
                                chosen = Some(sheet.clone());
                            }
                        }
                    });
            });
        });
        if let Some(sheet) = chosen {
            if sheet != self.selected_sheet() {
                self.select_sheet(&sheet, dialogs);
            }
        }
    }

    fn set_sheets_options(&mut self, options: Option<Vec<String>>) {
        match options {
            Some(options) => {
                self.sheets_options = options;
                self.sheet_enabled = true;
            }
            None => {
                self.sheets_options.clear();
                self.sheet_enabled = false;
            }
        }
    }

    fn set_dataset(&mut self, dataset: Option<Arc<Dataset>>) {
        self.dataset = dataset.clone();
        for handler in &mut self.handlers {
            handler(dataset.clone());
        }
    }
}
