use serde::{Deserialize, Serialize};

/// A single observation. Extra fields in source records are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named, ordered sequence of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub points: Vec<Point>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Parallel x and y columns, in point order.
pub fn split_columns(points: &[Point]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x, p.y)).unzip()
}

/// Smallest and largest x of the points, or `None` when empty.
pub fn x_range(points: &[Point]) -> Option<(f64, f64)> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .fold((first.x, first.x), |(lo, hi), p| (lo.min(p.x), hi.max(p.x))),
    )
}
