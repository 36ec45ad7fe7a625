use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::state::dataset::{Dataset, Point};

const RETRY_PAUSE: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON source: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV source: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column \"{0}\"")]
    MissingColumn(&'static str),
    #[error("unsupported source format: .{0}")]
    UnsupportedFormat(String),
}

impl SourceError {
    /// Only I/O failures are worth another attempt; parse errors repeat.
    fn is_transient(&self) -> bool {
        matches!(self, SourceError::Io(_))
    }
}

/// Load a dataset source, choosing the parser from the file extension.
pub fn load_source(path: &Path) -> Result<Vec<Dataset>, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let datasets = match ext.as_str() {
        "json" => parse_json(&std::fs::read_to_string(path)?)?,
        "csv" => parse_delimited(std::fs::read(path)?.as_slice(), b',')?,
        "tsv" => parse_delimited(std::fs::read(path)?.as_slice(), b'\t')?,
        _ => return Err(SourceError::UnsupportedFormat(ext)),
    };

    tracing::info!("Loaded {} datasets from {:?}", datasets.len(), path);
    Ok(datasets)
}

/// `load_source`, retrying I/O failures up to `attempts` times in total.
pub fn load_source_with_retry(path: &Path, attempts: u32) -> Result<Vec<Dataset>, SourceError> {
    retry_transient(attempts, RETRY_PAUSE, |attempt| {
        let result = load_source(path);
        if let Err(e) = &result {
            tracing::debug!("Attempt {attempt}/{attempts} for {:?} failed: {e}", path);
        }
        result
    })
}

/// Run `load` until it succeeds, fails with a non-transient error, or has
/// been tried `attempts` times. `load` receives the 1-based attempt number.
fn retry_transient<T>(
    attempts: u32,
    pause: Duration,
    mut load: impl FnMut(u32) -> Result<T, SourceError>,
) -> Result<T, SourceError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match load(attempt) {
            Err(e) if e.is_transient() && attempt < attempts => {
                attempt += 1;
                std::thread::sleep(pause);
            }
            result => return result,
        }
    }
}

/// Parse a JSON object mapping dataset name to an array of `{x, y}` records.
/// Key order is kept.
pub fn parse_json(text: &str) -> Result<Vec<Dataset>, SourceError> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;

    let mut datasets = Vec::with_capacity(map.len());
    for (name, value) in map {
        let points: Vec<Point> = serde_json::from_value(value)?;
        push_non_empty(&mut datasets, name, points);
    }
    Ok(datasets)
}

/// Parse long-format delimited text with `dataset`, `x` and `y` columns.
/// Rows are grouped by dataset in order of first appearance.
pub fn parse_delimited<R: std::io::Read>(
    reader: R,
    delimiter: u8,
) -> Result<Vec<Dataset>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(SourceError::MissingColumn(name))
    };
    let (name_col, x_col, y_col) = (column("dataset")?, column("x")?, column("y")?);

    let mut groups: Vec<(String, Vec<Point>)> = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        let (Some(name), Some(x), Some(y)) = (
            record.get(name_col),
            record.get(x_col).and_then(parse_finite),
            record.get(y_col).and_then(parse_finite),
        ) else {
            skipped += 1;
            continue;
        };

        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, points)) => points.push(Point::new(x, y)),
            None => groups.push((name.to_string(), vec![Point::new(x, y)])),
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {skipped} rows without a finite x/y pair");
    }

    let mut datasets = Vec::with_capacity(groups.len());
    for (name, points) in groups {
        push_non_empty(&mut datasets, name, points);
    }
    Ok(datasets)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn push_non_empty(datasets: &mut Vec<Dataset>, name: String, points: Vec<Point>) {
    if points.is_empty() {
        tracing::warn!("Dropping empty dataset \"{name}\"");
        return;
    }
    datasets.push(Dataset::new(name, points));
}
