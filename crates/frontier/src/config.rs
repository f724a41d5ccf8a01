//! Run configuration (`run.yaml`)
//!
//! ```yaml
//! prices: data/stock_data_cleaned.csv
//! output: data/simulation_results.csv
//! preview_rows: 5
//! sampling:
//!   trial_count: 10000
//!   risk_free_rate: 0.01
//!   seed: 42
//! ```
//!
//! Every field is optional in the file and can be overridden on the command line.

use std::path::{Path, PathBuf};

use frontier_core::SamplingConfig;
use serde::{Deserialize, Serialize};

/// Error types for loading a run configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn default_preview_rows() -> usize {
    5
}

/// Everything one `frontier simulate` invocation needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Clean price table: first column dates, one column per symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<PathBuf>,

    /// Results CSV destination; nothing is written when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Rows printed from the head of the result set
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prices: None,
            output: None,
            preview_rows: default_preview_rows(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prices: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub preview_rows: Option<usize>,
    pub trial_count: Option<usize>,
    pub risk_free_rate: Option<f64>,
    pub seed: Option<u64>,
    pub sequential: bool,
    pub no_weights: bool,
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Read a run file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
    }

    /// Start from the file when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self
            .to_yaml()
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        crate::util::io::atomic_write(path, &yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(prices) = &overrides.prices {
            self.prices = Some(prices.clone());
        }
        if let Some(output) = &overrides.output {
            self.output = Some(output.clone());
        }
        if let Some(rows) = overrides.preview_rows {
            self.preview_rows = rows;
        }
        if let Some(trials) = overrides.trial_count {
            self.sampling.trial_count = trials;
        }
        if let Some(rate) = overrides.risk_free_rate {
            self.sampling.risk_free_rate = rate;
        }
        if let Some(seed) = overrides.seed {
            self.sampling.seed = Some(seed);
        }
        if overrides.sequential {
            self.sampling.parallel = false;
        }
        if overrides.no_weights {
            self.sampling.keep_weights = false;
        }
        self
    }

    /// Price table path, required before a run can start
    pub fn prices_path(&self) -> Result<&Path, ConfigError> {
        self.prices.as_deref().ok_or_else(|| {
            ConfigError::Invalid("no price table given (use --prices or `prices:`)".to_string())
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prices_path()?;
        self.sampling
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
