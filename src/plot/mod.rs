//! Plot layer: instruction builder, figure abstraction and tick helpers.
//!
//! A [`builder::FigureBuilder`] collects drawing instructions; `build`
//! applies them in one batch to a [`figure::Figure`], which knows how to
//! render itself with `egui_plot`.

pub mod builder;
pub mod figure;
pub mod kinds;
pub mod ticks;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Interval – optional bounds on the x axis
// ---------------------------------------------------------------------------

/// A pair of optional bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Interval {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Interval {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Fill missing bounds from `fallback` (typically the data range).
    pub fn resolve(&self, fallback: (f64, f64)) -> (f64, f64) {
        (self.min.unwrap_or(fallback.0), self.max.unwrap_or(fallback.1))
    }
}
