use std::path::PathBuf;

use thiserror::Error;

use crate::config::SourceConfig;
use crate::data::loader::{self, SourceError};
use crate::state::dataset::Dataset;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("required dataset source {path:?} is unavailable: {source}")]
    MissingRequiredSource {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
}

/// Ordered mapping from dataset name to points. Insertion order is display
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRegistry {
    datasets: Vec<Dataset>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every source in order and merge them. A failing required source
    /// aborts; a failing optional source is logged and skipped.
    pub fn from_sources(sources: &[SourceConfig], attempts: u32) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for source in sources {
            match loader::load_source_with_retry(&source.path, attempts) {
                Ok(datasets) => registry.merge(datasets),
                Err(e) if source.required => {
                    tracing::error!("Required source {:?} failed: {e}", source.path);
                    return Err(RegistryError::MissingRequiredSource {
                        path: source.path.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping optional source {:?}: {e}", source.path);
                }
            }
        }
        tracing::info!("Registry ready with {} datasets", registry.len());
        Ok(registry)
    }

    /// Insert datasets, replacing same-named entries in place and appending
    /// new names.
    pub fn merge(&mut self, datasets: impl IntoIterator<Item = Dataset>) {
        for dataset in datasets {
            match self.datasets.iter_mut().find(|d| d.name == dataset.name) {
                Some(existing) => {
                    tracing::debug!("Dataset \"{}\" overridden by later source", dataset.name);
                    *existing = dataset;
                }
                None => self.datasets.push(dataset),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.name.as_str())
    }

    pub fn first(&self) -> Option<&Dataset> {
        self.datasets.first()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl FromIterator<Dataset> for DatasetRegistry {
    fn from_iter<I: IntoIterator<Item = Dataset>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.merge(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::summary::summarize;
    use crate::state::dataset::Point;
    use approx::assert_abs_diff_eq;

    fn ds(name: &str, x: f64) -> Dataset {
        Dataset::new(name, vec![Point::new(x, 0.0)])
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("scatterstat-reg-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn merge_overrides_in_place_and_appends() {
        let mut registry: DatasetRegistry = [ds("I", 1.0), ds("II", 2.0)].into_iter().collect();
        registry.merge([ds("III", 3.0), ds("I", 10.0)]);

        assert_eq!(registry.names().collect::<Vec<_>>(), ["I", "II", "III"]);
        assert_eq!(registry.get("I").unwrap().points[0].x, 10.0);
        assert_eq!(registry.first().unwrap().name, "I");
    }

    #[test]
    fn missing_optional_source_is_skipped() {
        let required = write_temp("anscombe.json", r#"{"I": [{"x": 1, "y": 2}, {"x": 2, "y": 3}]}"#);
        let sources = [
            SourceConfig::required(&required),
            SourceConfig::optional(std::env::temp_dir().join("scatterstat-absent.json")),
        ];

        let registry = DatasetRegistry::from_sources(&sources, 1).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("I").is_some());

        std::fs::remove_file(required).ok();
    }

    #[test]
    fn later_source_wins_on_collision() {
        let first = write_temp("first.json", r#"{"a": [{"x": 1, "y": 1}], "b": [{"x": 2, "y": 2}]}"#);
        let second = write_temp("second.csv", "dataset,x,y\na,9,9\nc,3,3\n");
        let sources = [SourceConfig::required(&first), SourceConfig::optional(&second)];

        let registry = DatasetRegistry::from_sources(&sources, 1).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(registry.get("a").unwrap().points, vec![Point::new(9.0, 9.0)]);

        std::fs::remove_file(first).ok();
        std::fs::remove_file(second).ok();
    }

    #[test]
    fn bundled_quartet_shares_summary() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/anscombe.json");
        let registry = DatasetRegistry::from_sources(&[SourceConfig::required(path)], 1).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["I", "II", "III", "IV"]);

        for name in ["I", "II", "III", "IV"] {
            let summary = summarize(&registry.get(name).unwrap().points).unwrap();
            assert_eq!(summary.n, 11);
            assert_abs_diff_eq!(summary.mean_x, 9.0, epsilon = 1e-12);
            assert_abs_diff_eq!(summary.mean_y, 7.50, epsilon = 1e-2);
            assert_abs_diff_eq!(summary.r, 0.816, epsilon = 2e-3);
            assert_abs_diff_eq!(summary.b, 0.500, epsilon = 2e-3);
        }
    }

    #[test]
    fn missing_required_source_is_fatal() {
        let path = std::env::temp_dir().join("scatterstat-absent-required.json");
        let err = DatasetRegistry::from_sources(&[SourceConfig::required(&path)], 1).unwrap_err();
        let RegistryError::MissingRequiredSource { path: failed, .. } = err;
        assert_eq!(failed, path);
    }
}
