//! Immutable environment descriptor.

use serde::{Deserialize, Serialize};
use tranche_types::{EnvConfig, GridSpec, OrderSide};

use crate::error::EnvError;
use crate::grid::Grid;
use crate::runner::validate_config;

/// Lower bound of every observation feature.
pub const OBSERVATION_LOW: f64 = 0.0;
/// Upper bound of every observation feature.
pub const OBSERVATION_HIGH: f64 = 10.0;

/// Discrete action space, one action per price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    /// Number of actions
    pub n: usize,
}

impl ActionSpace {
    /// Returns `true` if `index` is a valid action.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.n
    }
}

/// Box observation space of the feature tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    /// `(2 * lookback, book_size, 2)`
    pub shape: [usize; 3],
    /// Lower bound
    pub low: f64,
    /// Upper bound
    pub high: f64,
}

impl ObservationSpace {
    /// Observation space for the given lookback and book depth.
    #[must_use]
    pub fn new(lookback: usize, book_size: usize) -> Self {
        Self {
            shape: [2 * lookback, book_size, 2],
            low: OBSERVATION_LOW,
            high: OBSERVATION_HIGH,
        }
    }
}

/// Validated configuration together with its grids and spaces.
///
/// Never mutated in place: the `with_*` setters return a new descriptor and
/// the environment swaps it in wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSpec {
    config: EnvConfig,
    levels: Grid,
    time: Grid,
    inventory: Grid,
    action_space: ActionSpace,
    observation_space: ObservationSpace,
}

impl EnvSpec {
    /// Validates `config` and builds the grids.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] for invalid settings.
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        validate_config(&config)?;
        let levels = Grid::build(config.levels)?;
        let time = Grid::build(config.time)?;
        let inventory = Grid::build(config.inventory)?;

        Ok(Self {
            action_space: ActionSpace { n: levels.len() },
            observation_space: ObservationSpace::new(config.lookback, config.book_size),
            config,
            levels,
            time,
            inventory,
        })
    }

    /// Descriptor with a different order side.
    #[must_use]
    pub fn with_side(&self, side: OrderSide) -> Self {
        let mut next = self.clone();
        next.config.side = side;
        next
    }

    /// Descriptor with a different price-level grid; resizes the action space.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] for an invalid grid.
    pub fn with_levels(&self, levels: GridSpec) -> Result<Self, EnvError> {
        self.rebuild(|config| config.levels = levels)
    }

    /// Descriptor with a different time grid.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] for an invalid grid.
    pub fn with_time(&self, time: GridSpec) -> Result<Self, EnvError> {
        self.rebuild(|config| config.time = time)
    }

    /// Descriptor with a different inventory grid.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] for an invalid grid.
    pub fn with_inventory(&self, inventory: GridSpec) -> Result<Self, EnvError> {
        self.rebuild(|config| config.inventory = inventory)
    }

    /// Descriptor with a different lookback; reshapes the observation space.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] if `lookback` is zero.
    pub fn with_lookback(&self, lookback: usize) -> Result<Self, EnvError> {
        self.rebuild(|config| config.lookback = lookback)
    }

    /// Descriptor with a different book depth; reshapes the observation space.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] if `book_size` is zero.
    pub fn with_book_size(&self, book_size: usize) -> Result<Self, EnvError> {
        self.rebuild(|config| config.book_size = book_size)
    }

    fn rebuild(&self, edit: impl FnOnce(&mut EnvConfig)) -> Result<Self, EnvError> {
        let mut config = self.config.clone();
        edit(&mut config);
        Self::new(config)
    }

    /// Underlying configuration
    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Order side
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.config.side
    }

    /// Price-level grid
    #[must_use]
    pub fn levels(&self) -> &Grid {
        &self.levels
    }

    /// Remaining-time grid
    #[must_use]
    pub fn time(&self) -> &Grid {
        &self.time
    }

    /// Remaining-inventory grid
    #[must_use]
    pub fn inventory(&self) -> &Grid {
        &self.inventory
    }

    /// Lookback window
    #[must_use]
    pub fn lookback(&self) -> usize {
        self.config.lookback
    }

    /// Book depth
    #[must_use]
    pub fn book_size(&self) -> usize {
        self.config.book_size
    }

    /// Residual quantity treated as fully executed
    #[must_use]
    pub fn qty_tolerance(&self) -> f64 {
        self.config.qty_tolerance
    }

    /// Largest inventory value, the reward and feature normalizer
    #[must_use]
    pub fn max_inventory(&self) -> f64 {
        self.inventory.last()
    }

    /// Largest time value, the episode time budget
    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.time.last()
    }

    /// Action space
    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    /// Observation space
    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        self.observation_space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spaces() {
        let spec = EnvSpec::new(EnvConfig::default()).unwrap();
        assert_eq!(spec.action_space().n, 101);
        assert_eq!(spec.observation_space().shape, [50, 10, 2]);
        assert_eq!(spec.time().values().len(), 11);
        assert_eq!(spec.max_inventory(), 1.0);
        assert_eq!(spec.max_time(), 100.0);
        assert_eq!(spec.side(), OrderSide::Sell);
    }

    #[test]
    fn test_setters_return_new_descriptor() {
        let spec = EnvSpec::new(EnvConfig::default()).unwrap();
        let narrowed = spec.with_levels(GridSpec::new(-2.0, 2.0, 1.0)).unwrap();
        assert_eq!(narrowed.action_space().n, 5);
        assert_eq!(spec.action_space().n, 101);

        let reshaped = narrowed.with_lookback(3).unwrap().with_book_size(4).unwrap();
        assert_eq!(reshaped.observation_space().shape, [6, 4, 2]);
        assert_eq!(reshaped.action_space().n, 5);

        let buying = reshaped.with_side(OrderSide::Buy);
        assert_eq!(buying.side(), OrderSide::Buy);
        assert_eq!(reshaped.side(), OrderSide::Sell);
    }

    #[test]
    fn test_setters_validate() {
        let spec = EnvSpec::new(EnvConfig::default()).unwrap();
        assert!(spec.with_time(GridSpec::new(0.0, 10.0, 0.0)).is_err());
        assert!(spec.with_inventory(GridSpec::new(1.0, 0.0, 0.1)).is_err());
        assert!(spec.with_lookback(0).is_err());
        assert!(spec.with_book_size(0).is_err());
    }

    #[test]
    fn test_action_space_contains() {
        let space = ActionSpace { n: 3 };
        assert!(space.contains(2));
        assert!(!space.contains(3));
    }
}
