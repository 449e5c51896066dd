use std::path::Path;

use crate::error::CoreError;
use crate::order::OrderSide;

/// `(min, max, step)` triple describing one discretized grid
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    /// First grid value
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
    /// Increment between values, must be > 0
    pub step: f64,
}

impl GridSpec {
    /// Creates a new grid spec.
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// Main environment configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EnvConfig {
    /// Side of the parent order
    pub side: OrderSide,
    /// Price-level offsets (action space)
    pub levels: GridSpec,
    /// Remaining-time buckets in seconds
    pub time: GridSpec,
    /// Remaining-inventory buckets
    pub inventory: GridSpec,
    /// Number of past snapshots in the feature tensor
    pub lookback: usize,
    /// Book depth in the feature tensor
    pub book_size: usize,
    /// Unexecuted quantity at or below this counts as fully executed
    pub qty_tolerance: f64,
    /// Run mode
    pub run_mode: RunMode,
    /// RNG seed for episode sampling
    pub rng_seed: Option<u64>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

const DEFAULT_RNG_SEED: u64 = 42;

/// Residual below which a remaining quantity is treated as zero.
pub const DEFAULT_QTY_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, serde::Deserialize)]
struct EnvConfigRaw {
    #[serde(default = "default_side")]
    pub side: OrderSide,
    #[serde(default = "default_levels")]
    pub levels: GridSpec,
    #[serde(default = "default_time")]
    pub time: GridSpec,
    #[serde(default = "default_inventory")]
    pub inventory: GridSpec,
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    #[serde(default = "default_book_size")]
    pub book_size: usize,
    #[serde(default = "default_qty_tolerance")]
    pub qty_tolerance: f64,
    #[serde(default)]
    pub run_mode: RunMode,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl From<EnvConfigRaw> for EnvConfig {
    fn from(raw: EnvConfigRaw) -> Self {
        let rng_seed = match raw.run_mode {
            RunMode::Dev => Some(raw.rng_seed.unwrap_or(DEFAULT_RNG_SEED)),
            RunMode::Prod => raw.rng_seed,
        };

        Self {
            side: raw.side,
            levels: raw.levels,
            time: raw.time,
            inventory: raw.inventory,
            lookback: raw.lookback,
            book_size: raw.book_size,
            qty_tolerance: raw.qty_tolerance,
            run_mode: raw.run_mode,
            rng_seed,
            logging: raw.logging,
        }
    }
}

impl<'de> serde::Deserialize<'de> for EnvConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = EnvConfigRaw::deserialize(deserializer)?;
        Ok(raw.into())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            side: default_side(),
            levels: default_levels(),
            time: default_time(),
            inventory: default_inventory(),
            lookback: default_lookback(),
            book_size: default_book_size(),
            qty_tolerance: DEFAULT_QTY_TOLERANCE,
            run_mode: RunMode::Dev,
            rng_seed: Some(DEFAULT_RNG_SEED),
            logging: LoggingConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`CoreError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a configuration from YAML.
    ///
    /// # Errors
    /// Returns [`CoreError::Yaml`] on malformed input.
    pub fn from_yaml(yaml: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    /// Returns an IO error if the file cannot be read, or a parse error.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }
}

fn default_side() -> OrderSide {
    OrderSide::Sell
}

fn default_levels() -> GridSpec {
    GridSpec::new(-50.0, 50.0, 1.0)
}

fn default_time() -> GridSpec {
    GridSpec::new(0.0, 100.0, 10.0)
}

fn default_inventory() -> GridSpec {
    GridSpec::new(0.0, 1.0, 0.1)
}

fn default_lookback() -> usize {
    25
}

fn default_book_size() -> usize {
    10
}

fn default_qty_tolerance() -> f64 {
    DEFAULT_QTY_TOLERANCE
}

/// Run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Development mode, episodes are seeded by default
    #[default]
    Dev,
    /// Production mode, unseeded unless `rng_seed` is given
    Prod,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoggingConfig {
    /// Log every step at info level (debug otherwise)
    #[serde(default)]
    pub enable_step_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_step_logging: false,
        }
    }
}
