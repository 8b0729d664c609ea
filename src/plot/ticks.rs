use egui_plot::{GridInput, GridMark};

// ---------------------------------------------------------------------------
// Tick label formatting
// ---------------------------------------------------------------------------

/// Format a tick value with as much precision as it needs and no more.
///
/// Moderate magnitudes keep three significant digits in fixed notation with
/// trailing zeros dropped (`0.00125`, `2.5`, `1000`); very small or very large
/// values switch to scientific notation (`1.00e5`).
pub fn relevant_precision_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if (1e-3..1e4).contains(&magnitude) {
        let exponent = magnitude.log10().floor() as i32;
        let decimals = (2 - exponent).max(0) as usize;
        let text = format!("{value:.decimals$}");
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            text
        }
    } else {
        format!("{value:.2e}")
    }
}

// ---------------------------------------------------------------------------
// Log axis grid marks
// ---------------------------------------------------------------------------

/// Grid marks for an axis drawn in log10 space over `[min, max]`.
///
/// Each decade boundary gets a major mark. With `minor` set, the 2..9
/// multiples inside each decade are marked too.
pub fn log_marks(min: f64, max: f64, minor: bool) -> Vec<(f64, f64)> {
    let mut marks = Vec::new();
    if !(min.is_finite() && max.is_finite()) || min > max {
        return marks;
    }
    for decade in min.floor() as i32..=max.ceil() as i32 {
        let decade = f64::from(decade);
        if (min..=max).contains(&decade) {
            marks.push((decade, 1.0));
        }
        if minor {
            marks.extend(
                (2..10)
                    .map(|m| (decade + f64::from(m).log10(), 0.1))
                    .filter(|(value, _)| (min..=max).contains(value)),
            );
        }
    }
    marks
}

/// `egui_plot` grid spacer built on [`log_marks`].
pub fn log_grid_spacer(input: GridInput, minor: bool) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    log_marks(min, max, minor)
        .into_iter()
        .map(|(value, step_size)| GridMark { value, step_size })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_moderate_values_in_fixed_notation() {
        assert_eq!(relevant_precision_string(0.0), "0");
        assert_eq!(relevant_precision_string(2.5), "2.5");
        assert_eq!(relevant_precision_string(1000.0), "1000");
        assert_eq!(relevant_precision_string(0.001), "0.001");
        assert_eq!(relevant_precision_string(0.012345), "0.0123");
        assert_eq!(relevant_precision_string(-123.456), "-123");
        assert_eq!(relevant_precision_string(10.0), "10");
    }

    #[test]
    fn formats_extreme_values_in_scientific_notation() {
        assert_eq!(relevant_precision_string(100000.0), "1.00e5");
        assert_eq!(relevant_precision_string(0.00025), "2.50e-4");
    }

    #[test]
    fn decade_marks_only_without_minor_locator() {
        let marks = log_marks(-0.5, 2.0, false);
        let values: Vec<f64> = marks.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, [0.0, 1.0, 2.0]);
        assert!(marks.iter().all(|(_, step)| *step == 1.0));
    }

    #[test]
    fn minor_marks_fill_each_decade() {
        let marks = log_marks(0.0, 1.0, true);
        // 1, 2..9 in the first decade, then 10.
        assert_eq!(marks.len(), 10);
        assert!(marks.iter().all(|(v, _)| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn inverted_bounds_have_no_marks() {
        assert!(log_marks(2.0, 1.0, true).is_empty());
        assert!(log_marks(f64::NAN, 1.0, false).is_empty());
    }
}
