#![allow(dead_code)]

use tranche_data::Orderbook;
use tranche_env::{EnvSpec, ExecutionEnv};
use tranche_execution::BookWalkMatcher;
use tranche_types::{BookLevel, BookSnapshot, EnvConfig, GridSpec};

pub const SECOND_NS: i64 = 1_000_000_000;

/// `n` identical snapshots one second apart: bids 99/98/97 holding
/// `bid_qty` each, asks 101/102/103 holding 1.0 each.
pub fn flat_book(n: usize, bid_qty: f64) -> Orderbook {
    let snapshots = (0..n)
        .map(|k| {
            BookSnapshot::new(
                k as i64 * SECOND_NS,
                vec![
                    BookLevel::new(99.0, bid_qty),
                    BookLevel::new(98.0, bid_qty),
                    BookLevel::new(97.0, bid_qty),
                ],
                vec![
                    BookLevel::new(101.0, 1.0),
                    BookLevel::new(102.0, 1.0),
                    BookLevel::new(103.0, 1.0),
                ],
            )
        })
        .collect();
    Orderbook::new(snapshots).unwrap()
}

/// Levels `(-2, 2, 1)`, time `(0, 20, 10)`, inventory `(0, 1, 0.5)`.
pub fn small_config() -> EnvConfig {
    EnvConfig {
        levels: GridSpec::new(-2.0, 2.0, 1.0),
        time: GridSpec::new(0.0, 20.0, 10.0),
        inventory: GridSpec::new(0.0, 1.0, 0.5),
        lookback: 3,
        book_size: 3,
        rng_seed: Some(42),
        ..EnvConfig::default()
    }
}

pub fn env_over(config: EnvConfig, book: Orderbook) -> ExecutionEnv<Orderbook> {
    let mut env = ExecutionEnv::new(EnvSpec::new(config).unwrap(), BookWalkMatcher::new());
    env.set_orderbook(book);
    env
}

/// Action index of level 0 in the small level grid.
pub const PASSIVE: usize = 2;
/// Action index of level -1 (best bid for a sell).
pub const CROSS_BEST: usize = 1;
/// Action index of level 2, far from the touch.
pub const FAR: usize = 4;
