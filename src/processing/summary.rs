use crate::processing::statistics::{self, StatsError};
use crate::state::dataset::{split_columns, x_range, Point};

/// Descriptive statistics and least-squares fit of one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSummary {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub sd_x: f64,
    pub sd_y: f64,
    /// Pearson correlation.
    pub r: f64,
    /// Regression intercept.
    pub a: f64,
    /// Regression slope.
    pub b: f64,
}

impl StatsSummary {
    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.a + self.b * x
    }

    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Compute the summary of a point list. Requires at least two points with
/// non-constant x and y.
pub fn summarize(points: &[Point]) -> Result<StatsSummary, StatsError> {
    if points.len() < 2 {
        return Err(StatsError::InsufficientData {
            got: points.len(),
            min: 2,
        });
    }

    let (x, y) = split_columns(points);
    let fit = statistics::linear_regression(&x, &y)?;

    Ok(StatsSummary {
        n: points.len(),
        mean_x: statistics::mean(&x)?,
        mean_y: statistics::mean(&y)?,
        sd_x: statistics::sample_std_dev(&x)?,
        sd_y: statistics::sample_std_dev(&y)?,
        r: statistics::pearson_correlation(&x, &y)?,
        a: fit.a,
        b: fit.b,
    })
}

/// Segment of the fitted line over the x-range of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub p1: Point,
    pub p2: Point,
}

impl RegressionLine {
    pub fn spanning(summary: &StatsSummary, points: &[Point]) -> Option<Self> {
        let (x_min, x_max) = x_range(points)?;
        Some(Self {
            p1: Point::new(x_min, summary.predict(x_min)),
            p2: Point::new(x_max, summary.predict(x_max)),
        })
    }
}
