pub mod format;

use crate::processing::summary::{RegressionLine, StatsSummary};
use crate::state::dataset::Point;

/// Receives the summary of the active dataset.
pub trait TableRenderer {
    fn render_table(&mut self, name: &str, summary: &StatsSummary);
}

/// Receives the points of the active dataset and, when the regression
/// toggle is on, the fitted segment.
pub trait ChartRenderer {
    fn render_chart(&mut self, name: &str, points: &[Point], line: Option<&RegressionLine>);
}
