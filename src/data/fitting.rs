use std::fmt;
use std::sync::Arc;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// FittingData – a dataset plus the chosen x / y columns
// ---------------------------------------------------------------------------

/// The columns of a loaded dataset that take part in the fit.
#[derive(Debug, Clone)]
pub struct FittingData {
    dataset: Arc<Dataset>,
    x_column: String,
    y_column: String,
}

impl FittingData {
    /// Use the first column as x and the second as y.
    ///
    /// Returns `None` when the dataset has fewer than two columns.
    pub fn new(dataset: Arc<Dataset>) -> Option<Self> {
        let (x_column, y_column) = {
            let mut names = dataset.column_names();
            (names.next()?.to_string(), names.next()?.to_string())
        };
        Some(Self {
            dataset,
            x_column,
            y_column,
        })
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn x_column(&self) -> &str {
        &self.x_column
    }

    pub fn y_column(&self) -> &str {
        &self.y_column
    }

    /// Switch the x column; unknown names are ignored.
    pub fn set_x_column(&mut self, name: &str) -> bool {
        if self.dataset.column(name).is_none() {
            return false;
        }
        self.x_column = name.to_string();
        true
    }

    /// Switch the y column; unknown names are ignored.
    pub fn set_y_column(&mut self, name: &str) -> bool {
        if self.dataset.column(name).is_none() {
            return false;
        }
        self.y_column = name.to_string();
        true
    }

    pub fn x(&self) -> &[f64] {
        self.dataset.column(&self.x_column).unwrap_or(&[])
    }

    pub fn y(&self) -> &[f64] {
        self.dataset.column(&self.y_column).unwrap_or(&[])
    }

    /// `(x, y)` records in row order.
    pub fn records(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x().iter().copied().zip(self.y().iter().copied())
    }

    /// Smallest and largest finite x value.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.x()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ---------------------------------------------------------------------------
// FittingFunction – a named model evaluated at given parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("parameter {index} ('{text}') is not a number")]
    NotANumber { index: usize, text: String },

    #[error("{function} expects {expected} parameters, got {actual}")]
    WrongCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A fitting model: `y = f(a, x)` with a fixed number of parameters `a`.
#[derive(Clone, Copy)]
pub struct FittingFunction {
    pub name: &'static str,
    /// Display name, used as the base of plot titles and file names.
    pub title_name: &'static str,
    pub syntax: &'static str,
    pub n_parameters: usize,
    func: fn(&[f64], f64) -> f64,
}

impl fmt::Debug for FittingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittingFunction")
            .field("name", &self.name)
            .field("n_parameters", &self.n_parameters)
            .finish_non_exhaustive()
    }
}

impl FittingFunction {
    /// Evaluate the model at `x`.
    pub fn evaluate(&self, a: &[f64], x: f64) -> Result<f64, ParameterError> {
        self.check_parameters(a)?;
        Ok((self.func)(a, x))
    }

    pub fn check_parameters(&self, a: &[f64]) -> Result<(), ParameterError> {
        if a.len() != self.n_parameters {
            return Err(ParameterError::WrongCount {
                function: self.title_name,
                expected: self.n_parameters,
                actual: a.len(),
            });
        }
        Ok(())
    }
}

pub const CATALOG: &[FittingFunction] = &[
    FittingFunction {
        name: "linear",
        title_name: "Linear",
        syntax: "a[0] + a[1] * x",
        n_parameters: 2,
        func: |a, x| a[0] + a[1] * x,
    },
    FittingFunction {
        name: "parabolic",
        title_name: "Parabolic",
        syntax: "a[0] + a[1] * x + a[2] * x ^ 2",
        n_parameters: 3,
        func: |a, x| a[0] + a[1] * x + a[2] * x.powi(2),
    },
    FittingFunction {
        name: "polynomial",
        title_name: "Polynomial",
        syntax: "a[0] + a[1] * x + a[2] * x ^ 2 + a[3] * x ^ 3",
        n_parameters: 4,
        func: |a, x| a[0] + a[1] * x + a[2] * x.powi(2) + a[3] * x.powi(3),
    },
    FittingFunction {
        name: "exponential",
        title_name: "Exponential",
        syntax: "a[0] * exp(a[1] * x) + a[2]",
        n_parameters: 3,
        func: |a, x| a[0] * (a[1] * x).exp() + a[2],
    },
    FittingFunction {
        name: "hyperbolic",
        title_name: "Hyperbolic",
        syntax: "a[0] / (x + a[1]) + a[2]",
        n_parameters: 3,
        func: |a, x| a[0] / (x + a[1]) + a[2],
    },
    FittingFunction {
        name: "cos",
        title_name: "Cosine",
        syntax: "a[0] * cos(a[1] * x + a[2]) + a[3]",
        n_parameters: 4,
        func: |a, x| a[0] * (a[1] * x + a[2]).cos() + a[3],
    },
];

#[cfg(test)]
pub fn by_name(name: &str) -> Option<FittingFunction> {
    CATALOG.iter().find(|f| f.name == name).copied()
}

/// Parse comma and/or whitespace separated parameter values.
pub fn parse_parameters(text: &str) -> Result<Vec<f64>, ParameterError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .enumerate()
        .map(|(index, tok)| {
            tok.parse::<f64>().map_err(|_| ParameterError::NotANumber {
                index,
                text: tok.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_columns([
            ("t".to_string(), vec![3.0, 1.0, 2.0]),
            ("v".to_string(), vec![6.0, 2.0, 4.0]),
            ("i".to_string(), vec![1.0, 1.0, 1.0]),
        ]))
    }

    #[test]
    fn defaults_to_first_two_columns() {
        let data = FittingData::new(dataset()).unwrap();
        assert_eq!(data.x_column(), "t");
        assert_eq!(data.y_column(), "v");
        assert_eq!(data.x_range(), Some((1.0, 3.0)));
    }

    #[test]
    fn single_column_dataset_has_no_fitting_data() {
        let ds = Arc::new(Dataset::from_columns([("t".to_string(), vec![1.0])]));
        assert!(FittingData::new(ds).is_none());
    }

    #[test]
    fn column_switching_rejects_unknown_names() {
        let mut data = FittingData::new(dataset()).unwrap();
        assert!(data.set_y_column("i"));
        assert!(!data.set_x_column("nope"));
        assert_eq!(data.x_column(), "t");
        assert_eq!(data.y(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn evaluates_catalog_functions() {
        let linear = by_name("linear").unwrap();
        assert_eq!(linear.evaluate(&[1.0, 2.0], 3.0), Ok(7.0));

        let parabolic = by_name("parabolic").unwrap();
        assert_eq!(parabolic.evaluate(&[0.0, 0.0, 1.0], -2.0), Ok(4.0));
    }

    #[test]
    fn wrong_parameter_count_is_reported() {
        let linear = by_name("linear").unwrap();
        assert_eq!(
            linear.evaluate(&[1.0], 0.0),
            Err(ParameterError::WrongCount {
                function: "Linear",
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn parses_parameter_text() {
        assert_eq!(parse_parameters("1, 2.5  -3e2"), Ok(vec![1.0, 2.5, -300.0]));
        assert_eq!(parse_parameters("  "), Ok(vec![]));
        assert_eq!(
            parse_parameters("1, x"),
            Err(ParameterError::NotANumber {
                index: 1,
                text: "x".to_string()
            })
        );
    }
}
