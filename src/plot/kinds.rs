use super::builder::FigureBuilder;
use super::Interval;
use crate::consts::CURVE_SAMPLES;
use crate::data::fitting::{FittingData, FittingFunction};
use crate::state::SharedSession;

/// Extra drawing instructions a concrete plot adds on top of the
/// configuration box's title / labels / grid / legend.
pub type AdditionalInstructions = Box<dyn Fn(&mut FigureBuilder, &Interval)>;

// ---------------------------------------------------------------------------
// Callbacks bound to the shared fit session
// ---------------------------------------------------------------------------

pub fn data_plot(session: SharedSession) -> AdditionalInstructions {
    Box::new(move |builder: &mut FigureBuilder, interval: &Interval| {
        let session = session.borrow();
        if let Some(data) = &session.data {
            add_data(builder, data, interval);
        }
    })
}

pub fn fit_plot(session: SharedSession) -> AdditionalInstructions {
    Box::new(move |builder: &mut FigureBuilder, interval: &Interval| {
        let session = session.borrow();
        let Some(data) = &session.data else {
            return;
        };
        add_data(builder, data, interval);
        if let Some(function) = &session.function {
            add_fit_curve(builder, data, function, &session.parameters, interval);
        }
    })
}

pub fn residuals_plot(session: SharedSession) -> AdditionalInstructions {
    Box::new(move |builder: &mut FigureBuilder, interval: &Interval| {
        let session = session.borrow();
        if let (Some(data), Some(function)) = (&session.data, &session.function) {
            add_residuals(builder, data, function, &session.parameters, interval);
        }
    })
}

// ---------------------------------------------------------------------------
// Instruction helpers
// ---------------------------------------------------------------------------

/// Scatter of the records whose x lies inside `interval`.
pub fn add_data(builder: &mut FigureBuilder, data: &FittingData, interval: &Interval) {
    let points: Vec<[f64; 2]> = data
        .records()
        .filter(|(x, _)| interval.contains(*x))
        .map(|(x, y)| [x, y])
        .collect();
    builder.add_scatter("Data", points);
    if !interval.is_unbounded() {
        builder.add_x_limits(*interval);
    }
}

/// The function curve sampled evenly across the interval (data range for
/// missing bounds). Nothing is drawn when the parameters do not match.
pub fn add_fit_curve(
    builder: &mut FigureBuilder,
    data: &FittingData,
    function: &FittingFunction,
    parameters: &[f64],
    interval: &Interval,
) {
    if let Err(e) = function.check_parameters(parameters) {
        log::debug!("Skipping fit curve: {e}");
        return;
    }
    let Some(data_range) = data.x_range() else {
        return;
    };
    let (start, end) = interval.resolve(data_range);
    if start.partial_cmp(&end) != Some(std::cmp::Ordering::Less) {
        return;
    }
    let step = (end - start) / (CURVE_SAMPLES - 1) as f64;
    let points: Vec<[f64; 2]> = (0..CURVE_SAMPLES)
        .map(|i| start + step * i as f64)
        .filter_map(|x| function.evaluate(parameters, x).ok().map(|y| [x, y]))
        .filter(|[_, y]| y.is_finite())
        .collect();
    builder.add_line(function.title_name, points);
}

/// `y - f(x)` for every record inside the interval, plus a zero line.
pub fn add_residuals(
    builder: &mut FigureBuilder,
    data: &FittingData,
    function: &FittingFunction,
    parameters: &[f64],
    interval: &Interval,
) {
    if let Err(e) = function.check_parameters(parameters) {
        log::debug!("Skipping residuals: {e}");
        return;
    }
    let points: Vec<[f64; 2]> = data
        .records()
        .filter(|(x, _)| interval.contains(*x))
        .filter_map(|(x, y)| function.evaluate(parameters, x).ok().map(|fx| [x, y - fx]))
        .collect();
    builder.add_scatter("Residuals", points);
    builder.add_horizontal_line("Zero", 0.0);
    if !interval.is_unbounded() {
        builder.add_x_limits(*interval);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::data::fitting::by_name;
    use crate::data::model::Dataset;
    use crate::plot::builder::Instruction;
    use crate::state::FitSession;

    fn fitting_data() -> FittingData {
        let ds = Dataset::from_columns([
            ("x".to_string(), vec![0.0, 1.0, 2.0, 3.0]),
            ("y".to_string(), vec![1.0, 3.0, 5.5, 7.0]),
        ]);
        FittingData::new(Arc::new(ds)).unwrap()
    }

    fn scatter_points(builder: &FigureBuilder, wanted: &str) -> Vec<[f64; 2]> {
        builder
            .instructions()
            .iter()
            .find_map(|i| match i {
                Instruction::Scatter { name, points } if name == wanted => Some(points.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn data_is_restricted_to_the_interval() {
        let mut builder = FigureBuilder::new();
        add_data(&mut builder, &fitting_data(), &Interval::new(Some(1.0), Some(2.0)));
        assert_eq!(scatter_points(&builder, "Data"), vec![[1.0, 3.0], [2.0, 5.5]]);
        assert!(builder
            .instructions()
            .contains(&Instruction::XLimits(Interval::new(Some(1.0), Some(2.0)))));
    }

    #[test]
    fn fit_curve_spans_the_data_range() {
        let mut builder = FigureBuilder::new();
        let linear = by_name("linear").unwrap();
        add_fit_curve(&mut builder, &fitting_data(), &linear, &[1.0, 2.0], &Interval::default());

        let Some(Instruction::Line { name, points }) = builder.instructions().first() else {
            panic!("expected a line");
        };
        assert_eq!(name, "Linear");
        assert_eq!(points.len(), CURVE_SAMPLES);
        assert_eq!(points[0], [0.0, 1.0]);
        let last = points[CURVE_SAMPLES - 1];
        assert!((last[0] - 3.0).abs() < 1e-9);
        assert!((last[1] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn fit_curve_is_skipped_for_wrong_parameter_count() {
        let mut builder = FigureBuilder::new();
        let linear = by_name("linear").unwrap();
        add_fit_curve(&mut builder, &fitting_data(), &linear, &[1.0], &Interval::default());
        assert!(builder.instructions().is_empty());
    }

    #[test]
    fn residuals_subtract_the_model() {
        let mut builder = FigureBuilder::new();
        let linear = by_name("linear").unwrap();
        add_residuals(&mut builder, &fitting_data(), &linear, &[1.0, 2.0], &Interval::default());
        assert_eq!(
            scatter_points(&builder, "Residuals"),
            vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.5], [3.0, 0.0]]
        );
        assert!(builder.instructions().contains(&Instruction::HorizontalLine {
            name: "Zero".to_string(),
            y: 0.0
        }));
    }

    #[test]
    fn session_callbacks_read_current_state() {
        let session: SharedSession = Rc::new(RefCell::new(FitSession::default()));
        let fit = fit_plot(Rc::clone(&session));

        let mut empty = FigureBuilder::new();
        fit(&mut empty, &Interval::default());
        assert!(empty.instructions().is_empty());

        {
            let mut s = session.borrow_mut();
            s.data = Some(fitting_data());
            s.function = by_name("linear");
            s.parameters = vec![1.0, 2.0];
        }
        let mut builder = FigureBuilder::new();
        fit(&mut builder, &Interval::default());
        assert_eq!(builder.instructions().len(), 2);
    }
}
