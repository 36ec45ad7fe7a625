use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::theme::Theme;

pub const CONFIG_ENV_VAR: &str = "SCATTERSTAT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "scatterstat.json";

/// One dataset source. Sources are merged in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub required: bool,
}

impl SourceConfig {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sources: Vec<SourceConfig>,
    /// Decimal places shown in the summary table.
    pub decimals: usize,
    /// Initial state of the regression line toggle.
    pub show_regression: bool,
    pub plot_height: f32,
    /// Attempts per source when reading fails with an I/O error.
    pub load_attempts: u32,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::required("data/anscombe.json"),
                SourceConfig::optional("data/datasaurus.json"),
            ],
            decimals: 2,
            show_regression: true,
            plot_height: 420.0,
            load_attempts: 3,
            theme: Theme::default(),
        }
    }
}

impl AppConfig {
    /// Load from `$SCATTERSTAT_CONFIG`, or `scatterstat.json` in the working
    /// directory. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_json(&text)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
