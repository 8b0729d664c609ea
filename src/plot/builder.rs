use super::figure::{Figure, Series, SeriesKind};
use super::Interval;

// ---------------------------------------------------------------------------
// Drawing instructions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Title(String),
    XLabel(String),
    YLabel(String),
    Grid,
    Legend,
    /// Keep the given x range in view.
    XLimits(Interval),
    Scatter {
        name: String,
        points: Vec<[f64; 2]>,
    },
    Line {
        name: String,
        points: Vec<[f64; 2]>,
    },
    HorizontalLine {
        name: String,
        y: f64,
    },
}

// ---------------------------------------------------------------------------
// FigureBuilder – accumulate, then apply in one batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FigureBuilder {
    instructions: Vec<Instruction>,
}

impl FigureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn add_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.push(Instruction::Title(title.into()))
    }

    pub fn add_xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.push(Instruction::XLabel(label.into()))
    }

    pub fn add_ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.push(Instruction::YLabel(label.into()))
    }

    pub fn add_grid(&mut self) -> &mut Self {
        self.push(Instruction::Grid)
    }

    pub fn add_legend(&mut self) -> &mut Self {
        self.push(Instruction::Legend)
    }

    pub fn add_x_limits(&mut self, interval: Interval) -> &mut Self {
        self.push(Instruction::XLimits(interval))
    }

    pub fn add_scatter(&mut self, name: impl Into<String>, points: Vec<[f64; 2]>) -> &mut Self {
        self.push(Instruction::Scatter {
            name: name.into(),
            points,
        })
    }

    pub fn add_line(&mut self, name: impl Into<String>, points: Vec<[f64; 2]>) -> &mut Self {
        self.push(Instruction::Line {
            name: name.into(),
            points,
        })
    }

    pub fn add_horizontal_line(&mut self, name: impl Into<String>, y: f64) -> &mut Self {
        self.push(Instruction::HorizontalLine {
            name: name.into(),
            y,
        })
    }

    /// Apply every instruction, in insertion order, to `figure`.
    pub fn build(&self, figure: &mut Figure) {
        for instruction in &self.instructions {
            match instruction {
                Instruction::Title(title) => figure.set_title(title),
                Instruction::XLabel(label) => figure.set_xlabel(label),
                Instruction::YLabel(label) => figure.set_ylabel(label),
                Instruction::Grid => figure.set_grid(true),
                Instruction::Legend => figure.set_legend(true),
                Instruction::XLimits(interval) => figure.set_x_limits(*interval),
                Instruction::Scatter { name, points } => figure.add_series(Series {
                    name: name.clone(),
                    kind: SeriesKind::Scatter,
                    points: points.clone(),
                }),
                Instruction::Line { name, points } => figure.add_series(Series {
                    name: name.clone(),
                    kind: SeriesKind::Line,
                    points: points.clone(),
                }),
                Instruction::HorizontalLine { name, y } => figure.add_series(Series {
                    name: name.clone(),
                    kind: SeriesKind::HorizontalLine,
                    points: vec![[0.0, *y]],
                }),
            }
        }
    }

    fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_instructions_in_order() {
        let mut builder = FigureBuilder::new();
        builder.add_title("Fit").add_grid().add_xlabel("t");
        assert_eq!(
            builder.instructions(),
            &[
                Instruction::Title("Fit".to_string()),
                Instruction::Grid,
                Instruction::XLabel("t".to_string()),
            ]
        );
    }

    #[test]
    fn build_applies_everything_to_the_figure() {
        let mut builder = FigureBuilder::new();
        builder
            .add_title("Linear - Fit")
            .add_xlabel("t")
            .add_ylabel("v")
            .add_grid()
            .add_legend()
            .add_scatter("Data", vec![[1.0, 2.0], [2.0, 4.0]])
            .add_horizontal_line("Zero", 0.0);

        let mut figure = Figure::new("test");
        builder.build(&mut figure);

        assert_eq!(figure.title(), Some("Linear - Fit"));
        assert_eq!(figure.xlabel(), Some("t"));
        assert_eq!(figure.ylabel(), Some("v"));
        assert!(figure.grid());
        assert!(figure.legend());
        assert_eq!(figure.series().len(), 2);
        assert_eq!(figure.series()[0].kind, SeriesKind::Scatter);
        assert_eq!(figure.series()[1].points, vec![[0.0, 0.0]]);
    }

    #[test]
    fn empty_builder_leaves_figure_untouched() {
        let mut figure = Figure::new("blank");
        FigureBuilder::new().build(&mut figure);
        assert_eq!(figure.title(), None);
        assert!(!figure.grid());
        assert!(figure.series().is_empty());
    }
}
