//! Config validation and environment construction helpers.

use std::path::Path;

use tranche_data::OrderbookSource;
use tranche_execution::BookWalkMatcher;
use tranche_types::{EnvConfig, GridSpec};

use crate::env::ExecutionEnv;
use crate::error::EnvError;
use crate::spec::EnvSpec;

/// Main entry point: parses config JSON and builds an environment over
/// `orderbook` with the default matcher.
///
/// # Errors
/// - [`EnvError::ConfigParse`] when JSON parsing fails.
/// - [`EnvError::ConfigValidation`] for invalid configuration values.
pub fn build_env_from_json<S: OrderbookSource>(
    config_json: &str,
    orderbook: S,
) -> Result<ExecutionEnv<S, BookWalkMatcher>, EnvError> {
    let config =
        EnvConfig::from_json(config_json).map_err(|e| EnvError::ConfigParse(e.to_string()))?;
    build_env(config, orderbook)
}

/// Loads a JSON or YAML config file and builds an environment over
/// `orderbook` with the default matcher.
///
/// # Errors
/// - [`EnvError::Core`] when the file cannot be read or parsed.
/// - [`EnvError::ConfigValidation`] for invalid configuration values.
pub fn build_env_from_path<S: OrderbookSource>(
    path: &Path,
    orderbook: S,
) -> Result<ExecutionEnv<S, BookWalkMatcher>, EnvError> {
    let config = EnvConfig::load(path)?;
    build_env(config, orderbook)
}

fn build_env<S: OrderbookSource>(
    config: EnvConfig,
    orderbook: S,
) -> Result<ExecutionEnv<S, BookWalkMatcher>, EnvError> {
    let spec = EnvSpec::new(config)?;
    let mut env = ExecutionEnv::new(spec, BookWalkMatcher::new());
    env.set_orderbook(orderbook);
    Ok(env)
}

/// Validates an environment configuration.
///
/// # Errors
/// Returns [`EnvError::ConfigValidation`] naming the first offending field.
pub fn validate_config(config: &EnvConfig) -> Result<(), EnvError> {
    validate_grid("levels", config.levels)?;
    validate_grid("time", config.time)?;
    validate_grid("inventory", config.inventory)?;

    if config.time.min < 0.0 {
        return Err(EnvError::ConfigValidation(
            "time.min must be >= 0".to_string(),
        ));
    }
    if config.inventory.max <= 0.0 {
        return Err(EnvError::ConfigValidation(
            "inventory.max must be > 0".to_string(),
        ));
    }

    if config.lookback == 0 {
        return Err(EnvError::ConfigValidation(
            "lookback must be > 0".to_string(),
        ));
    }
    if config.book_size == 0 {
        return Err(EnvError::ConfigValidation(
            "book_size must be > 0".to_string(),
        ));
    }

    if !config.qty_tolerance.is_finite() || config.qty_tolerance < 0.0 {
        return Err(EnvError::ConfigValidation(format!(
            "qty_tolerance must be finite and >= 0, got {}",
            config.qty_tolerance
        )));
    }

    Ok(())
}

fn validate_grid(name: &str, grid: GridSpec) -> Result<(), EnvError> {
    if !grid.min.is_finite() || !grid.max.is_finite() || !grid.step.is_finite() {
        return Err(EnvError::ConfigValidation(format!(
            "{name} bounds must be finite"
        )));
    }
    if grid.step <= 0.0 {
        return Err(EnvError::ConfigValidation(format!(
            "{name}.step must be > 0"
        )));
    }
    if grid.min > grid.max {
        return Err(EnvError::ConfigValidation(format!(
            "{name}.min must be <= {name}.max"
        )));
    }
    Ok(())
}
