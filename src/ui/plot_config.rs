use eframe::egui::{self, Color32, RichText, Ui};
use serde::Serialize;

use crate::consts::IMAGE_EXTENSION;
use crate::data::fitting::{FittingData, FittingFunction};
use crate::plot::builder::FigureBuilder;
use crate::plot::figure::{Figure, Locator, Scale, TickFormatter};
use crate::plot::kinds::AdditionalInstructions;
use crate::plot::Interval;

const LABEL_WIDTH: f32 = 70.0;
const LONG_INPUT_WIDTH: f32 = 220.0;

// ---------------------------------------------------------------------------
// Errors and the parameter bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotConfigError {
    #[error("{field} value must be a floating number")]
    InvalidBound { field: &'static str, text: String },
}

/// Everything the figure needs from the configuration box, resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotKwargs {
    pub title_name: String,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub grid: bool,
    /// Absent for boxes built without legend support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<bool>,
    pub x_log_scale: bool,
    pub y_log_scale: bool,
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
}

// ---------------------------------------------------------------------------
// Plot configuration box
// ---------------------------------------------------------------------------

/// Titles, labels, scales and domain for one kind of plot.
///
/// Empty inputs fall back to values derived from the loaded fitting function
/// (title, file name) and fitting data (axis labels).
pub struct PlotConfigurationBox {
    suffix: String,
    additional_instructions: AdditionalInstructions,

    title_input: String,
    xlabel_input: String,
    ylabel_input: String,
    grid: bool,
    /// `None` when the box has no legend support.
    legend: Option<bool>,
    x_log_scale: bool,
    y_log_scale: bool,

    x_domain: bool,
    bounds_visible: bool,
    x_min_input: String,
    x_max_input: String,

    base_name: Option<String>,
    xcolumn: Option<String>,
    ycolumn: Option<String>,
}

impl PlotConfigurationBox {
    pub fn new(
        additional_instructions: AdditionalInstructions,
        suffix: impl Into<String>,
        has_legend: bool,
    ) -> Self {
        Self {
            suffix: suffix.into(),
            additional_instructions,
            title_input: String::new(),
            xlabel_input: String::new(),
            ylabel_input: String::new(),
            grid: false,
            legend: has_legend.then_some(false),
            x_log_scale: false,
            y_log_scale: false,
            x_domain: false,
            bounds_visible: false,
            x_min_input: String::new(),
            x_max_input: String::new(),
            base_name: None,
            xcolumn: None,
            ycolumn: None,
        }
    }

    // -- derived values --

    pub fn title(&self) -> String {
        if !self.title_input.is_empty() {
            return self.title_input.clone();
        }
        match &self.base_name {
            Some(base) => format!("{base} - {}", title_case(&self.suffix)),
            None => self.suffix.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        let suffix = self.suffix.replace(' ', "_");
        let name = match &self.base_name {
            Some(base) => format!("{}_{suffix}.{IMAGE_EXTENSION}", base.replace(' ', "_")),
            None => format!("{suffix}.{IMAGE_EXTENSION}"),
        };
        name.to_lowercase()
    }

    pub fn xlabel(&self) -> Option<String> {
        if !self.xlabel_input.is_empty() {
            return Some(self.xlabel_input.clone());
        }
        self.xcolumn.clone()
    }

    pub fn ylabel(&self) -> Option<String> {
        if !self.ylabel_input.is_empty() {
            return Some(self.ylabel_input.clone());
        }
        self.ycolumn.clone()
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn legend(&self) -> bool {
        self.legend.unwrap_or(false)
    }

    pub fn x_log_scale(&self) -> bool {
        self.x_log_scale
    }

    pub fn y_log_scale(&self) -> bool {
        self.y_log_scale
    }

    /// User supplied minimum of x, only while the custom domain is on.
    pub fn xmin(&self) -> Result<Option<f64>, PlotConfigError> {
        self.bound("X minimum", &self.x_min_input)
    }

    /// User supplied maximum of x, only while the custom domain is on.
    pub fn xmax(&self) -> Result<Option<f64>, PlotConfigError> {
        self.bound("X maximum", &self.x_max_input)
    }

    pub fn interval(&self) -> Result<Interval, PlotConfigError> {
        Ok(Interval::new(self.xmin()?, self.xmax()?))
    }

    pub fn get_plot_kwargs(&self) -> Result<PlotKwargs, PlotConfigError> {
        Ok(PlotKwargs {
            title_name: self.title(),
            xlabel: self.xlabel(),
            ylabel: self.ylabel(),
            grid: self.grid(),
            legend: self.legend,
            x_log_scale: self.x_log_scale(),
            y_log_scale: self.y_log_scale(),
            xmin: self.xmin()?,
            xmax: self.xmax()?,
        })
    }

    /// Whether the min / max labels and inputs are shown.
    pub fn bounds_visible(&self) -> bool {
        self.bounds_visible
    }

    pub fn x_domain(&self) -> bool {
        self.x_domain
    }

    pub fn x_min_input(&self) -> &str {
        &self.x_min_input
    }

    pub fn x_max_input(&self) -> &str {
        &self.x_max_input
    }

    // -- inputs --

    pub fn set_title_input(&mut self, text: impl Into<String>) {
        self.title_input = text.into();
    }

    pub fn set_xlabel_input(&mut self, text: impl Into<String>) {
        self.xlabel_input = text.into();
    }

    pub fn set_ylabel_input(&mut self, text: impl Into<String>) {
        self.ylabel_input = text.into();
    }

    pub fn set_x_min_input(&mut self, text: impl Into<String>) {
        self.x_min_input = text.into();
    }

    pub fn set_x_max_input(&mut self, text: impl Into<String>) {
        self.x_max_input = text.into();
    }

    pub fn toggle_grid(&mut self) {
        self.grid = !self.grid;
    }

    pub fn toggle_legend(&mut self) {
        if let Some(legend) = &mut self.legend {
            *legend = !*legend;
        }
    }

    pub fn toggle_x_log_scale(&mut self) {
        self.x_log_scale = !self.x_log_scale;
    }

    pub fn toggle_y_log_scale(&mut self) {
        self.y_log_scale = !self.y_log_scale;
    }

    /// Custom X domain switch. Turning it off clears both bounds.
    pub fn set_x_domain(&mut self, enabled: bool) {
        self.x_domain = enabled;
        if enabled {
            self.bounds_visible = true;
        } else {
            self.x_min_input.clear();
            self.x_max_input.clear();
            self.bounds_visible = false;
        }
    }

    // -- upstream changes --

    pub fn on_fitting_function_load(&mut self, fitting_function: Option<&FittingFunction>) {
        self.base_name = fitting_function.map(|f| f.title_name.to_string());
    }

    pub fn on_fitting_data_load(&mut self, fitting_data: Option<&FittingData>) {
        match fitting_data {
            Some(data) => {
                self.xcolumn = Some(data.x_column().to_string());
                self.ycolumn = Some(data.y_column().to_string());
            }
            None => {
                self.xcolumn = None;
                self.ycolumn = None;
            }
        }
    }

    // -- drawing --

    pub fn build_figure_builder(&self) -> Result<FigureBuilder, PlotConfigError> {
        let kwargs = self.get_plot_kwargs()?;
        let mut builder = FigureBuilder::new();
        if !kwargs.title_name.is_empty() {
            builder.add_title(kwargs.title_name);
        }
        if let Some(label) = kwargs.xlabel {
            builder.add_xlabel(label);
        }
        if let Some(label) = kwargs.ylabel {
            builder.add_ylabel(label);
        }
        if kwargs.grid {
            builder.add_grid();
        }
        if kwargs.legend == Some(true) {
            builder.add_legend();
        }
        let interval = Interval::new(kwargs.xmin, kwargs.xmax);
        (self.additional_instructions)(&mut builder, &interval);
        Ok(builder)
    }

    /// Log-scale axes get relevant-precision labels and no minor ticks.
    pub fn set_scale(&self, figure: &mut Figure) {
        if self.x_log_scale {
            let axis = figure.x_axis_mut();
            axis.set_scale(Scale::Log);
            axis.set_major_formatter(TickFormatter::RelevantPrecision);
            axis.set_minor_locator(Locator::Null);
        }
        if self.y_log_scale {
            let axis = figure.y_axis_mut();
            axis.set_scale(Scale::Log);
            axis.set_major_formatter(TickFormatter::RelevantPrecision);
            axis.set_minor_locator(Locator::Null);
        }
    }

    /// Build every instruction onto `figure` (a [`Figure`] or a raw id to
    /// wrap in one) and apply the axis scales.
    pub fn on_draw(&self, figure: impl Into<Figure>) -> Result<Figure, PlotConfigError> {
        let mut figure = figure.into();
        let builder = self.build_figure_builder()?;
        builder.build(&mut figure);
        self.set_scale(&mut figure);
        Ok(figure)
    }

    /// Render the box.
    pub fn ui(&mut self, ui: &mut Ui) {
        let mut title = self.title_input.clone();
        if text_row(ui, "Title:", &mut title, |_| {}) {
            self.set_title_input(title);
        }

        let mut xlabel = self.xlabel_input.clone();
        let mut x_log = self.x_log_scale();
        if text_row(ui, "X label:", &mut xlabel, |ui: &mut Ui| {
            ui.checkbox(&mut x_log, "X log scale");
        }) {
            self.set_xlabel_input(xlabel);
        }
        if x_log != self.x_log_scale() {
            self.toggle_x_log_scale();
        }

        let mut ylabel = self.ylabel_input.clone();
        let mut y_log = self.y_log_scale();
        if text_row(ui, "Y label:", &mut ylabel, |ui: &mut Ui| {
            ui.checkbox(&mut y_log, "Y log scale");
        }) {
            self.set_ylabel_input(ylabel);
        }
        if y_log != self.y_log_scale() {
            self.toggle_y_log_scale();
        }

        ui.horizontal(|ui: &mut Ui| {
            let mut grid = self.grid();
            if ui.checkbox(&mut grid, "Grid").changed() {
                self.toggle_grid();
            }
            if self.legend.is_some() {
                let mut legend = self.legend();
                if ui.checkbox(&mut legend, "Legend").changed() {
                    self.toggle_legend();
                }
            }
        });

        ui.horizontal(|ui: &mut Ui| {
            let mut enabled = self.x_domain();
            if ui.checkbox(&mut enabled, "Custom X domain").changed() {
                self.set_x_domain(enabled);
            }
            if self.bounds_visible() {
                ui.label("X minimum:");
                let mut min = self.x_min_input().to_string();
                if ui
                    .add(egui::TextEdit::singleline(&mut min).desired_width(60.0))
                    .changed()
                {
                    self.set_x_min_input(min);
                }
                ui.label("X maximum:");
                let mut max = self.x_max_input().to_string();
                if ui
                    .add(egui::TextEdit::singleline(&mut max).desired_width(60.0))
                    .changed()
                {
                    self.set_x_max_input(max);
                }
            }
        });

        if let Err(e) = self.interval() {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }

    /// Only an empty field is unset; blank text still has to parse.
    fn bound(&self, field: &'static str, text: &str) -> Result<Option<f64>, PlotConfigError> {
        if !self.x_domain || text.is_empty() {
            return Ok(None);
        }
        text.trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| PlotConfigError::InvalidBound {
                field,
                text: text.to_string(),
            })
    }
}

/// A labelled single-line input with optional trailing widgets. Returns
/// whether the text changed.
fn text_row(ui: &mut Ui, label: &str, text: &mut String, extra: impl FnOnce(&mut Ui)) -> bool {
    ui.horizontal(|ui: &mut Ui| {
        ui.add_sized([LABEL_WIDTH, 18.0], egui::Label::new(label));
        let changed = ui
            .add(egui::TextEdit::singleline(text).desired_width(LONG_INPUT_WIDTH))
            .changed();
        extra(ui);
        changed
    })
    .inner
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::fitting::by_name;
    use crate::data::model::Dataset;
    use crate::plot::builder::Instruction;

    fn no_extras() -> AdditionalInstructions {
        Box::new(|_: &mut FigureBuilder, _: &Interval| {})
    }

    fn config(suffix: &str, has_legend: bool) -> PlotConfigurationBox {
        PlotConfigurationBox::new(no_extras(), suffix, has_legend)
    }

    fn fitting_data() -> FittingData {
        let ds = Dataset::from_columns([
            ("Time".to_string(), vec![1.0, 2.0]),
            ("Voltage".to_string(), vec![3.0, 4.0]),
        ]);
        FittingData::new(Arc::new(ds)).unwrap()
    }

    #[test]
    fn title_falls_back_to_base_name_and_suffix() {
        let mut panel = config("residuals", true);
        assert_eq!(panel.title(), "residuals");

        panel.base_name = Some("Linear Fit".to_string());
        assert_eq!(panel.title(), "Linear Fit - Residuals");

        panel.set_title_input("My plot");
        assert_eq!(panel.title(), "My plot");
    }

    #[test]
    fn title_uses_fitting_function_name() {
        let mut panel = config("fit", true);
        panel.on_fitting_function_load(by_name("exponential").as_ref());
        assert_eq!(panel.title(), "Exponential - Fit");
        panel.on_fitting_function_load(None);
        assert_eq!(panel.title(), "fit");
    }

    #[test]
    fn file_name_is_lowercase_with_underscores() {
        let mut panel = config("fit", true);
        assert_eq!(panel.file_name(), "fit.png");

        let mut spaced = config("data points", true);
        spaced.base_name = Some("Linear Fit".to_string());
        assert_eq!(spaced.file_name(), "linear_fit_data_points.png");

        panel.base_name = Some("Cosine".to_string());
        assert_eq!(panel.file_name(), "cosine_fit.png");
    }

    #[test]
    fn labels_fall_back_to_data_columns() {
        let mut panel = config("fit", true);
        assert_eq!(panel.xlabel(), None);

        panel.on_fitting_data_load(Some(&fitting_data()));
        assert_eq!(panel.xlabel().as_deref(), Some("Time"));
        assert_eq!(panel.ylabel().as_deref(), Some("Voltage"));

        panel.on_fitting_data_load(None);
        assert_eq!(panel.xlabel(), None);
        assert_eq!(panel.ylabel(), None);
    }

    #[test]
    fn explicit_labels_win_over_data_columns() {
        let mut panel = config("fit", true);
        panel.on_fitting_data_load(Some(&fitting_data()));
        panel.set_ylabel_input("V [volt]");
        panel.set_xlabel_input("t [s]");
        assert_eq!(panel.ylabel().as_deref(), Some("V [volt]"));
        assert_eq!(panel.xlabel().as_deref(), Some("t [s]"));

        panel.on_fitting_data_load(None);
        assert_eq!(panel.xlabel().as_deref(), Some("t [s]"));

        panel.set_xlabel_input("");
        assert_eq!(panel.xlabel(), None);
    }

    #[test]
    fn bounds_are_unset_while_custom_domain_is_off() {
        let mut panel = config("fit", true);
        panel.set_x_min_input("1.5");
        panel.set_x_max_input("abc");
        assert_eq!(panel.xmin(), Ok(None));
        assert_eq!(panel.xmax(), Ok(None));
        assert_eq!(panel.interval(), Ok(Interval::default()));
    }

    #[test]
    fn bounds_parse_when_custom_domain_is_on() {
        let mut panel = config("fit", true);
        panel.set_x_domain(true);
        panel.set_x_min_input(" -2.5 ");
        assert_eq!(panel.xmin(), Ok(Some(-2.5)));
        assert_eq!(panel.xmax(), Ok(None));
    }

    #[test]
    fn non_numeric_bound_is_a_validation_error() {
        let mut panel = config("fit", true);
        panel.set_x_domain(true);
        panel.set_x_min_input("abc");

        let err = panel.xmin().unwrap_err();
        assert_eq!(err.to_string(), "X minimum value must be a floating number");
        assert!(panel.get_plot_kwargs().is_err());
        assert!(panel.build_figure_builder().is_err());
    }

    #[test]
    fn blank_bound_is_a_validation_error() {
        let mut panel = config("fit", true);
        panel.set_x_domain(true);
        panel.set_x_max_input("   ");

        assert_eq!(panel.xmin(), Ok(None));
        assert_eq!(
            panel.xmax(),
            Err(PlotConfigError::InvalidBound {
                field: "X maximum",
                text: "   ".to_string()
            })
        );
        assert!(panel.get_plot_kwargs().is_err());
        assert!(panel.build_figure_builder().is_err());
    }

    #[test]
    fn toggling_custom_domain_shows_and_clears_bounds() {
        let mut panel = config("fit", true);
        assert!(!panel.bounds_visible());

        panel.set_x_domain(true);
        assert!(panel.x_domain());
        assert!(panel.bounds_visible());
        panel.set_x_min_input("1");
        panel.set_x_max_input("2");

        panel.set_x_domain(false);
        assert!(!panel.bounds_visible());
        assert_eq!(panel.x_min_input(), "");
        assert_eq!(panel.x_max_input(), "");

        panel.set_x_domain(true);
        assert_eq!(panel.interval(), Ok(Interval::default()));
    }

    #[test]
    fn kwargs_omit_legend_without_legend_support() {
        let mut with = config("fit", true);
        with.toggle_legend();
        let kwargs = with.get_plot_kwargs().unwrap();
        assert_eq!(kwargs.legend, Some(true));

        let mut without = config("residuals", false);
        without.toggle_legend();
        assert!(!without.legend());
        let kwargs = without.get_plot_kwargs().unwrap();
        assert_eq!(kwargs.legend, None);

        let json = serde_json::to_value(&kwargs).unwrap();
        assert!(json.get("legend").is_none());
        assert_eq!(json["title_name"], "residuals");
        assert_eq!(json["xmin"], serde_json::Value::Null);
    }

    #[test]
    fn builder_gets_only_present_options_then_extras() {
        let extras: AdditionalInstructions = Box::new(|b: &mut FigureBuilder, i: &Interval| {
            b.add_x_limits(*i);
        });
        let mut panel = PlotConfigurationBox::new(extras, "fit", true);
        panel.toggle_grid();
        panel.set_x_domain(true);
        panel.set_x_max_input("10");

        let builder = panel.build_figure_builder().unwrap();
        assert_eq!(
            builder.instructions(),
            &[
                Instruction::Title("fit".to_string()),
                Instruction::Grid,
                Instruction::XLimits(Interval::new(None, Some(10.0))),
            ]
        );
    }

    #[test]
    fn on_draw_applies_scale_per_axis() {
        let mut panel = config("fit", true);
        panel.toggle_x_log_scale();
        panel.toggle_x_log_scale();
        panel.toggle_y_log_scale();
        assert!(!panel.x_log_scale());
        assert!(panel.y_log_scale());
        panel.on_fitting_data_load(Some(&fitting_data()));

        let figure = panel.on_draw(egui::Id::new("fit_plot")).unwrap();
        assert_eq!(figure.title(), Some("fit"));
        assert_eq!(figure.xlabel(), Some("Time"));
        assert_eq!(figure.x_axis().scale, Scale::Linear);
        assert_eq!(figure.x_axis().minor_locator, Locator::Auto);
        assert_eq!(figure.y_axis().scale, Scale::Log);
        assert_eq!(figure.y_axis().major_formatter, TickFormatter::RelevantPrecision);
        assert_eq!(figure.y_axis().minor_locator, Locator::Null);
    }

    #[test]
    fn on_draw_accepts_an_existing_figure() {
        let panel = config("data", false);
        let mut existing = Figure::new("data_plot");
        existing.set_grid(true);
        let figure = panel.on_draw(existing).unwrap();
        assert!(figure.grid());
        assert_eq!(figure.title(), Some("data"));
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("residuals"), "Residuals");
        assert_eq!(title_case("data points"), "Data Points");
        assert_eq!(title_case("fIT"), "Fit");
        assert_eq!(title_case("x-y plot"), "X-Y Plot");
    }
}
