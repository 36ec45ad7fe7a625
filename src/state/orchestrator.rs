use thiserror::Error;

use crate::data::registry::DatasetRegistry;
use crate::processing::statistics::StatsError;
use crate::processing::summary::{summarize, RegressionLine, StatsSummary};
use crate::render::{ChartRenderer, TableRenderer};
use crate::state::dataset::Point;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateError {
    #[error("no dataset named \"{0}\"")]
    UnknownDataset(String),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub active_dataset: String,
    pub show_regression: bool,
}

/// Result of one recomputation, before the toggle is applied. Borrows the
/// points of the dataset it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub summary: StatsSummary,
    pub line: RegressionLine,
    pub points: &'a [Point],
}

/// Recompute the summary and regression segment for `state`.
pub fn compute_frame<'a>(
    registry: &'a DatasetRegistry,
    state: &UiState,
) -> Result<Frame<'a>, UpdateError> {
    let dataset = registry
        .get(&state.active_dataset)
        .ok_or_else(|| UpdateError::UnknownDataset(state.active_dataset.clone()))?;

    let summary = summarize(&dataset.points)?;
    let line = RegressionLine::spanning(&summary, &dataset.points).ok_or(StatsError::EmptyInput)?;
    Ok(Frame {
        summary,
        line,
        points: &dataset.points,
    })
}

/// Ties the selection state to the two renderers. Every successful
/// transition recomputes the frame and re-renders both views; a failed one
/// leaves the renderers and the committed state untouched.
pub struct Orchestrator<T, C> {
    registry: DatasetRegistry,
    state: Option<UiState>,
    pending_show_regression: bool,
    table: T,
    chart: C,
}

impl<T: TableRenderer, C: ChartRenderer> Orchestrator<T, C> {
    pub fn new(registry: DatasetRegistry, show_regression: bool, table: T, chart: C) -> Self {
        Self {
            registry,
            state: None,
            pending_show_regression: show_regression,
            table,
            chart,
        }
    }

    /// Display the first dataset. Returns `Ok(false)` when the registry is
    /// empty and there is nothing to show.
    pub fn initialize(&mut self) -> Result<bool, UpdateError> {
        self.initialize_at(None)
    }

    /// Like [`initialize`](Self::initialize), but starts on `preferred` when
    /// the registry still has a dataset of that name.
    pub fn initialize_at(&mut self, preferred: Option<&str>) -> Result<bool, UpdateError> {
        let kept = preferred.and_then(|name| self.registry.get(name));
        if let (Some(name), None) = (preferred, kept) {
            tracing::info!("Dataset \"{name}\" is gone, showing the first one");
        }
        let Some(start) = kept.or_else(|| self.registry.first()) else {
            tracing::info!("Registry is empty, nothing to display");
            return Ok(false);
        };
        let next = UiState {
            active_dataset: start.name.clone(),
            show_regression: self.show_regression(),
        };
        self.transition(next)?;
        Ok(true)
    }

    pub fn select_dataset(&mut self, name: &str) -> Result<(), UpdateError> {
        let next = UiState {
            active_dataset: name.to_string(),
            show_regression: self.show_regression(),
        };
        self.transition(next)
    }

    pub fn set_show_regression(&mut self, show: bool) -> Result<(), UpdateError> {
        let Some(current) = &self.state else {
            self.pending_show_regression = show;
            return Ok(());
        };
        let next = UiState {
            active_dataset: current.active_dataset.clone(),
            show_regression: show,
        };
        self.transition(next)
    }

    fn transition(&mut self, next: UiState) -> Result<(), UpdateError> {
        let frame = compute_frame(&self.registry, &next).map_err(|e| {
            tracing::warn!("Cannot display \"{}\": {e}", next.active_dataset);
            e
        })?;

        self.table.render_table(&next.active_dataset, &frame.summary);
        self.chart.render_chart(
            &next.active_dataset,
            frame.points,
            next.show_regression.then_some(&frame.line),
        );

        tracing::debug!(
            "Rendered \"{}\" (n = {}, regression line {})",
            next.active_dataset,
            frame.summary.n,
            if next.show_regression { "on" } else { "off" }
        );
        self.pending_show_regression = next.show_regression;
        self.state = Some(next);
        Ok(())
    }

    pub fn state(&self) -> Option<&UiState> {
        self.state.as_ref()
    }

    pub fn active_dataset(&self) -> Option<&str> {
        self.state().map(|s| s.active_dataset.as_str())
    }

    pub fn show_regression(&self) -> bool {
        self.state()
            .map_or(self.pending_show_regression, |s| s.show_regression)
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::dataset::Dataset;

    #[derive(Default)]
    struct RecordingTable {
        calls: Vec<(String, StatsSummary)>,
    }

    impl TableRenderer for RecordingTable {
        fn render_table(&mut self, name: &str, summary: &StatsSummary) {
            self.calls.push((name.to_string(), *summary));
        }
    }

    #[derive(Default)]
    struct RecordingChart {
        calls: Vec<(String, usize, Option<RegressionLine>)>,
    }

    impl ChartRenderer for RecordingChart {
        fn render_chart(&mut self, name: &str, points: &[Point], line: Option<&RegressionLine>) {
            self.calls.push((name.to_string(), points.len(), line.copied()));
        }
    }

    fn line_dataset(name: &str) -> Dataset {
        Dataset::new(
            name,
            (0..5).map(|i| Point::new(i as f64, 3.0 + 2.0 * i as f64)).collect(),
        )
    }

    fn registry() -> DatasetRegistry {
        [
            line_dataset("I"),
            line_dataset("II"),
            Dataset::new("single", vec![Point::new(1.0, 1.0)]),
            Dataset::new("vertical", vec![Point::new(8.0, 1.0), Point::new(8.0, 2.0)]),
        ]
        .into_iter()
        .collect()
    }

    fn orchestrator(show: bool) -> Orchestrator<RecordingTable, RecordingChart> {
        Orchestrator::new(registry(), show, RecordingTable::default(), RecordingChart::default())
    }

    #[test]
    fn initialize_selects_first_dataset() {
        let mut o = orchestrator(true);
        assert!(o.initialize().unwrap());

        assert_eq!(o.active_dataset(), Some("I"));
        assert_eq!(o.table().calls.len(), 1);
        assert_eq!(o.table().calls[0].0, "I");
        let (name, n, line) = &o.chart().calls[0];
        assert_eq!((name.as_str(), *n), ("I", 5));
        let line = line.unwrap();
        assert_eq!(line.p1, Point::new(0.0, 3.0));
        assert_eq!(line.p2.x, 4.0);
    }

    #[test]
    fn empty_registry_is_idle() {
        let mut o = Orchestrator::new(
            DatasetRegistry::new(),
            true,
            RecordingTable::default(),
            RecordingChart::default(),
        );
        assert!(!o.initialize().unwrap());
        assert!(o.state().is_none());
        assert!(o.table().calls.is_empty());
        assert!(o.chart().calls.is_empty());
    }

    #[test]
    fn toggle_rerenders_chart_with_same_summary() {
        let mut o = orchestrator(true);
        o.initialize().unwrap();
        o.set_show_regression(false).unwrap();
        o.set_show_regression(true).unwrap();

        let chart = &o.chart().calls;
        assert_eq!(chart.len(), 3);
        assert!(chart[1].2.is_none());
        assert!(chart[2].2.is_some());

        let table = &o.table().calls;
        assert!(table.iter().all(|(name, s)| name == "I" && *s == table[0].1));
    }

    #[test]
    fn toggle_before_first_display_only_records_flag() {
        let mut o = orchestrator(true);
        o.set_show_regression(false).unwrap();
        assert!(o.chart().calls.is_empty());

        o.initialize().unwrap();
        assert!(o.chart().calls[0].2.is_none());
        assert!(!o.show_regression());
    }

    #[test]
    fn single_point_dataset_never_reaches_renderers() {
        let mut o = orchestrator(true);
        o.initialize().unwrap();

        let err = o.select_dataset("single").unwrap_err();
        assert_eq!(err, UpdateError::Stats(StatsError::InsufficientData { got: 1, min: 2 }));
        assert_eq!(o.table().calls.len(), 1);
        assert_eq!(o.chart().calls.len(), 1);
        assert_eq!(o.active_dataset(), Some("I"));
    }

    #[test]
    fn constant_x_dataset_is_degenerate() {
        let mut o = orchestrator(false);
        assert!(matches!(
            o.select_dataset("vertical"),
            Err(UpdateError::Stats(StatsError::DegenerateData(_)))
        ));
        assert!(o.state().is_none());
    }

    #[test]
    fn unknown_dataset_is_reported() {
        let mut o = orchestrator(true);
        assert_eq!(
            o.select_dataset("nope"),
            Err(UpdateError::UnknownDataset("nope".to_string()))
        );
        assert!(o.table().calls.is_empty());
    }

    #[test]
    fn selection_keeps_toggle() {
        let mut o = orchestrator(false);
        o.initialize().unwrap();
        o.select_dataset("II").unwrap();

        assert_eq!(
            o.state(),
            Some(&UiState {
                active_dataset: "II".to_string(),
                show_regression: false,
            })
        );
        assert!(o.chart().calls[1].2.is_none());
    }

    #[test]
    fn compute_frame_is_pure() {
        let registry = registry();
        let state = UiState {
            active_dataset: "II".to_string(),
            show_regression: false,
        };
        let a = compute_frame(&registry, &state).unwrap();
        let b = compute_frame(&registry, &state).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.line.p2, Point::new(4.0, 11.0));
        assert_eq!(a.points.len(), 5);
        assert_eq!(a.points, registry.get("II").unwrap().points.as_slice());
    }

    #[test]
    fn initialize_at_keeps_existing_selection() {
        let mut o = orchestrator(true);
        assert!(o.initialize_at(Some("II")).unwrap());

        assert_eq!(o.active_dataset(), Some("II"));
        assert_eq!(o.table().calls[0].0, "II");
        assert_eq!(o.chart().calls[0].1, 5);
    }

    #[test]
    fn initialize_at_missing_name_falls_back_to_first() {
        let mut o = orchestrator(true);
        assert!(o.initialize_at(Some("removed")).unwrap());
        assert_eq!(o.active_dataset(), Some("I"));
    }
}
