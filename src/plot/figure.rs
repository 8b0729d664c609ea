use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{GridMark, HLine, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use super::ticks::{log_grid_spacer, relevant_precision_string};
use super::Interval;
use crate::color::series_color;

// ---------------------------------------------------------------------------
// Axis configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// How major tick labels are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickFormatter {
    /// Whatever the plotting backend does by default.
    #[default]
    Default,
    /// [`relevant_precision_string`] of the tick value.
    RelevantPrecision,
}

/// Where minor ticks are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locator {
    #[default]
    Auto,
    /// No minor ticks at all.
    Null,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Axis {
    pub scale: Scale,
    pub major_formatter: TickFormatter,
    pub minor_locator: Locator,
}

impl Axis {
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn set_major_formatter(&mut self, formatter: TickFormatter) {
        self.major_formatter = formatter;
    }

    pub fn set_minor_locator(&mut self, locator: Locator) {
        self.minor_locator = locator;
    }

    /// Map a data value into plot space; `None` when it cannot be drawn.
    fn to_plot(self, value: f64) -> Option<f64> {
        match self.scale {
            Scale::Linear => value.is_finite().then_some(value),
            Scale::Log => (value.is_finite() && value > 0.0).then(|| value.log10()),
        }
    }

    fn from_plot(self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear => value,
            Scale::Log => 10.0f64.powf(value),
        }
    }

    /// Tick label for a plot-space value, or `None` to keep the default.
    fn tick_label(self, value: f64) -> Option<String> {
        match (self.scale, self.major_formatter) {
            (Scale::Linear, TickFormatter::Default) => None,
            (_, TickFormatter::RelevantPrecision) => {
                Some(relevant_precision_string(self.from_plot(value)))
            }
            (Scale::Log, TickFormatter::Default) => Some(format!("{}", self.from_plot(value))),
        }
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Scatter,
    Line,
    /// Only the y of the first point is used.
    HorizontalLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Figure – the drawing surface instructions are applied to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Figure {
    id: egui::Id,
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    grid: bool,
    legend: bool,
    x_limits: Interval,
    x_axis: Axis,
    y_axis: Axis,
    series: Vec<Series>,
}

impl From<egui::Id> for Figure {
    fn from(id: egui::Id) -> Self {
        Self {
            id,
            title: None,
            xlabel: None,
            ylabel: None,
            grid: false,
            legend: false,
            x_limits: Interval::default(),
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            series: Vec::new(),
        }
    }
}

impl From<&str> for Figure {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Figure {
    pub fn new(id_salt: impl std::hash::Hash) -> Self {
        Self::from(egui::Id::new(id_salt))
    }

    pub fn id(&self) -> egui::Id {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn legend(&self) -> bool {
        self.legend
    }

    pub fn x_limits(&self) -> Interval {
        self.x_limits
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn x_axis_mut(&mut self) -> &mut Axis {
        &mut self.x_axis
    }

    pub fn y_axis_mut(&mut self) -> &mut Axis {
        &mut self.y_axis
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn set_xlabel(&mut self, label: &str) {
        self.xlabel = Some(label.to_string());
    }

    pub fn set_ylabel(&mut self, label: &str) {
        self.ylabel = Some(label.to_string());
    }

    pub fn set_grid(&mut self, grid: bool) {
        self.grid = grid;
    }

    pub fn set_legend(&mut self, legend: bool) {
        self.legend = legend;
    }

    pub fn set_x_limits(&mut self, limits: Interval) {
        self.x_limits = limits;
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// Render the title and the plot. Log axes are drawn in log10 space;
    /// values that cannot be drawn there (non-positive) are skipped.
    pub fn show(&self, ui: &mut Ui) -> egui::Response {
        if let Some(title) = self.title() {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(title);
            });
        }

        let x_axis = *self.x_axis();
        let y_axis = *self.y_axis();
        let limits = self.x_limits();

        let mut plot = Plot::new(self.id())
            .show_grid(self.grid())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .label_formatter(move |name: &str, value: &PlotPoint| {
                let x = relevant_precision_string(x_axis.from_plot(value.x));
                let y = relevant_precision_string(y_axis.from_plot(value.y));
                if name.is_empty() {
                    format!("{x}, {y}")
                } else {
                    format!("{name}: {x}, {y}")
                }
            });

        if let Some(label) = self.xlabel() {
            plot = plot.x_axis_label(label);
        }
        if let Some(label) = self.ylabel() {
            plot = plot.y_axis_label(label);
        }
        if self.legend() {
            plot = plot.legend(Legend::default());
        }
        if let Some(min) = limits.min.and_then(|v| x_axis.to_plot(v)) {
            plot = plot.include_x(min);
        }
        if let Some(max) = limits.max.and_then(|v| x_axis.to_plot(v)) {
            plot = plot.include_x(max);
        }

        if x_axis.scale == Scale::Log {
            let minor = x_axis.minor_locator != Locator::Null;
            plot = plot.x_grid_spacer(move |input| log_grid_spacer(input, minor));
        }
        if y_axis.scale == Scale::Log {
            let minor = y_axis.minor_locator != Locator::Null;
            plot = plot.y_grid_spacer(move |input| log_grid_spacer(input, minor));
        }
        if x_axis.tick_label(0.0).is_some() {
            plot = plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                x_axis.tick_label(mark.value).unwrap_or_default()
            });
        }
        if y_axis.tick_label(0.0).is_some() {
            plot = plot.y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                y_axis.tick_label(mark.value).unwrap_or_default()
            });
        }

        let drawable = self
            .series()
            .iter()
            .filter(|s| s.kind != SeriesKind::HorizontalLine)
            .count();

        plot.show(ui, |plot_ui| {
            let mut color_index = 0;
            for series in self.series() {
                match series.kind {
                    SeriesKind::HorizontalLine => {
                        let Some(y) = series.points.first().and_then(|p| y_axis.to_plot(p[1]))
                        else {
                            continue;
                        };
                        plot_ui.hline(HLine::new(y).name(&series.name).color(Color32::GRAY));
                    }
                    SeriesKind::Scatter | SeriesKind::Line => {
                        let color = series_color(color_index, drawable);
                        color_index += 1;
                        let points: PlotPoints = series
                            .points
                            .iter()
                            .filter_map(|&[x, y]| Some([x_axis.to_plot(x)?, y_axis.to_plot(y)?]))
                            .collect();
                        if series.kind == SeriesKind::Scatter {
                            plot_ui.points(
                                Points::new(points)
                                    .name(&series.name)
                                    .color(color)
                                    .radius(3.0),
                            );
                        } else {
                            plot_ui.line(
                                Line::new(points)
                                    .name(&series.name)
                                    .color(color)
                                    .width(1.5),
                            );
                        }
                    }
                }
            }
        })
        .response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_figure_is_blank() {
        let figure = Figure::new("blank");
        assert_eq!(figure.title(), None);
        assert_eq!(*figure.x_axis(), Axis::default());
        assert!(figure.x_limits().is_unbounded());
    }

    #[test]
    fn wraps_raw_ids() {
        let id = egui::Id::new("fit_plot");
        let figure = Figure::from(id);
        assert_eq!(figure.id(), id);
        assert_eq!(Figure::from("fit_plot").id(), id);
    }

    #[test]
    fn log_axis_maps_values_into_decades() {
        let axis = Axis {
            scale: Scale::Log,
            ..Axis::default()
        };
        let decade = axis.to_plot(100.0).unwrap();
        assert!((decade - 2.0).abs() < 1e-12);
        assert_eq!(axis.to_plot(0.0), None);
        assert_eq!(axis.to_plot(-1.0), None);
        assert!((axis.from_plot(3.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn tick_labels_follow_formatter() {
        let linear = Axis::default();
        assert_eq!(linear.tick_label(2.5), None);

        let log = Axis {
            scale: Scale::Log,
            major_formatter: TickFormatter::RelevantPrecision,
            minor_locator: Locator::Null,
        };
        assert_eq!(log.tick_label(-2.0), Some("0.01".to_string()));
        assert_eq!(log.tick_label(5.0), Some("1.00e5".to_string()));
    }
}
