use thiserror::Error;

/// Errors raised by the statistics functions. Degenerate input fails
/// instead of producing NaN.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("cannot compute statistics of an empty sequence")]
    EmptyInput,
    #[error("need at least {min} points, got {got}")]
    InsufficientData { got: usize, min: usize },
    #[error("degenerate data: {0}")]
    DegenerateData(&'static str),
    #[error("x and y lengths differ ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },
}

/// Intercept and slope of an ordinary least-squares fit `y = a + b·x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub a: f64,
    pub b: f64,
}

/// Arithmetic mean.
///
/// Each value is scaled by `1/n` before summing so wide finite ranges do not
/// overflow. A constant sequence returns that constant exactly.
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    let first = *values.first().ok_or(StatsError::EmptyInput)?;
    if is_constant(values) {
        return Ok(first);
    }
    let n = values.len() as f64;
    Ok(values.iter().map(|v| v / n).sum())
}

/// Sample standard deviation (divisor n - 1).
pub fn sample_std_dev(values: &[f64]) -> Result<f64, StatsError> {
    require_points(values.len())?;
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((ss / (values.len() - 1) as f64).sqrt())
}

/// Pearson correlation coefficient. Fails when either variable is constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    let sums = CrossSums::compute(x, y)?;
    if sums.x_degenerate() {
        return Err(StatsError::DegenerateData("x values are constant"));
    }
    if sums.y_degenerate() {
        return Err(StatsError::DegenerateData("y values are constant"));
    }
    // Rounding can push collinear data a few ulps past the bounds.
    Ok((sums.sxy / (sums.sxx * sums.syy).sqrt()).clamp(-1.0, 1.0))
}

/// Least-squares regression of `y` on `x`. Fails when all x are equal.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<Regression, StatsError> {
    let sums = CrossSums::compute(x, y)?;
    if sums.x_degenerate() {
        return Err(StatsError::DegenerateData("x values are constant"));
    }
    let b = sums.sxy / sums.sxx;
    Ok(Regression {
        a: sums.mean_y - b * sums.mean_x,
        b,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

fn require_points(n: usize) -> Result<(), StatsError> {
    if n < 2 {
        return Err(StatsError::InsufficientData { got: n, min: 2 });
    }
    Ok(())
}

/// Centered sums of squares and cross products shared by correlation and
/// regression.
struct CrossSums {
    x_constant: bool,
    y_constant: bool,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl CrossSums {
    fn compute(x: &[f64], y: &[f64]) -> Result<Self, StatsError> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        require_points(x.len())?;

        let mean_x = mean(x)?;
        let mean_y = mean(y)?;
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (xi, yi) in x.iter().zip(y) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        Ok(Self {
            x_constant: is_constant(x),
            y_constant: is_constant(y),
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        })
    }

    /// Zero spread in x, either exactly constant or underflowed to zero.
    fn x_degenerate(&self) -> bool {
        self.x_constant || self.sxx == 0.0
    }

    fn y_degenerate(&self) -> bool {
        self.y_constant || self.syy == 0.0
    }
}
