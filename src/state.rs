use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use eframe::egui;

use crate::data::fitting::{parse_parameters, FittingData, FittingFunction};
use crate::data::model::Dataset;
use crate::plot::kinds;
use crate::ui::input_file::InputFileBox;
use crate::ui::plot_config::PlotConfigurationBox;

// ---------------------------------------------------------------------------
// Fit session – what the plot callbacks draw from
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FitSession {
    pub data: Option<FittingData>,
    pub function: Option<FittingFunction>,
    pub parameters: Vec<f64>,
}

pub type SharedSession = Rc<RefCell<FitSession>>;

// ---------------------------------------------------------------------------
// Plot tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotTab {
    Data,
    Fit,
    Residuals,
}

impl PlotTab {
    pub const ALL: [PlotTab; 3] = [PlotTab::Data, PlotTab::Fit, PlotTab::Residuals];

    pub fn label(self) -> &'static str {
        match self {
            PlotTab::Data => "Data",
            PlotTab::Fit => "Fit",
            PlotTab::Residuals => "Residuals",
        }
    }

    pub fn figure_id(self) -> egui::Id {
        egui::Id::new(("plot", self.label()))
    }
}

/// A PNG export waiting for the next screenshot.
#[derive(Debug, Clone)]
pub struct PendingExport {
    pub path: PathBuf,
    pub rect: egui::Rect,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub input: InputFileBox,
    pub session: SharedSession,

    pub data_config: PlotConfigurationBox,
    pub fit_config: PlotConfigurationBox,
    pub residuals_config: PlotConfigurationBox,

    pub active_tab: PlotTab,

    /// Raw parameter text as typed by the user.
    pub parameters_text: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Screen rectangle of the plot drawn last frame.
    pub plot_rect: Option<egui::Rect>,

    pub pending_export: Option<PendingExport>,

    dataset_events: Receiver<Option<Arc<Dataset>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_input(InputFileBox::default())
    }
}

impl AppState {
    #[cfg(test)]
    pub fn with_source(source: Box<dyn crate::data::loader::SheetSource>) -> Self {
        Self::with_input(InputFileBox::new(source))
    }

    fn with_input(mut input: InputFileBox) -> Self {
        let (tx, rx) = mpsc::channel();
        input.add_handler(move |dataset| {
            if tx.send(dataset).is_err() {
                log::warn!("Dataset change dropped: application state is gone");
            }
        });

        let session: SharedSession = Rc::default();
        Self {
            input,
            data_config: PlotConfigurationBox::new(kinds::data_plot(Rc::clone(&session)), "data", true),
            fit_config: PlotConfigurationBox::new(kinds::fit_plot(Rc::clone(&session)), "fit", true),
            residuals_config: PlotConfigurationBox::new(
                kinds::residuals_plot(Rc::clone(&session)),
                "residuals",
                false,
            ),
            session,
            active_tab: PlotTab::Data,
            parameters_text: String::new(),
            status_message: None,
            plot_rect: None,
            pending_export: None,
            dataset_events: rx,
        }
    }

    pub fn config(&self, tab: PlotTab) -> &PlotConfigurationBox {
        match tab {
            PlotTab::Data => &self.data_config,
            PlotTab::Fit => &self.fit_config,
            PlotTab::Residuals => &self.residuals_config,
        }
    }

    pub fn config_mut(&mut self, tab: PlotTab) -> &mut PlotConfigurationBox {
        match tab {
            PlotTab::Data => &mut self.data_config,
            PlotTab::Fit => &mut self.fit_config,
            PlotTab::Residuals => &mut self.residuals_config,
        }
    }

    /// Apply dataset changes reported by the input file box.
    pub fn process_dataset_events(&mut self) {
        while let Ok(dataset) = self.dataset_events.try_recv() {
            self.set_dataset(dataset);
        }
    }

    fn set_dataset(&mut self, dataset: Option<Arc<Dataset>>) {
        let data = match dataset {
            Some(ds) => {
                log::info!(
                    "Loaded {} records with columns {:?}",
                    ds.len(),
                    ds.column_names().collect::<Vec<_>>()
                );
                let data = FittingData::new(ds);
                self.status_message = data
                    .is_none()
                    .then(|| "Error: the sheet needs at least two columns".to_string());
                data
            }
            None => None,
        };
        self.session.borrow_mut().data = data;
        self.notify_data();
    }

    pub fn set_x_column(&mut self, name: &str) {
        let changed = self
            .session
            .borrow_mut()
            .data
            .as_mut()
            .is_some_and(|data| data.set_x_column(name));
        if changed {
            self.notify_data();
        }
    }

    pub fn set_y_column(&mut self, name: &str) {
        let changed = self
            .session
            .borrow_mut()
            .data
            .as_mut()
            .is_some_and(|data| data.set_y_column(name));
        if changed {
            self.notify_data();
        }
    }

    /// Select a fitting function; parameters reset to ones of the right count.
    pub fn set_function(&mut self, function: Option<FittingFunction>) {
        {
            let mut session = self.session.borrow_mut();
            session.function = function;
            session.parameters = function.map_or_else(Vec::new, |f| vec![1.0; f.n_parameters]);
            self.parameters_text = session
                .parameters
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
        }
        for config in [
            &mut self.data_config,
            &mut self.fit_config,
            &mut self.residuals_config,
        ] {
            config.on_fitting_function_load(function.as_ref());
        }
    }

    /// Parse `text` into the session parameters; bad text leaves the old
    /// parameters in place and reports the error.
    pub fn set_parameters_text(&mut self, text: String) {
        match parse_parameters(&text) {
            Ok(parameters) => {
                self.session.borrow_mut().parameters = parameters;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Rejected parameters '{text}': {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.parameters_text = text;
    }

    fn notify_data(&mut self) {
        let session = self.session.borrow();
        for config in [
            &mut self.data_config,
            &mut self.fit_config,
            &mut self.residuals_config,
        ] {
            config.on_fitting_data_load(session.data.as_ref());
        }
    }
}
