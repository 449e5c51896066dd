//! Property tests for the grid builder, the state projector and the
//! episode protocol.

use proptest::prelude::*;

use tranche_env::grid::Grid;
use tranche_env::projector::{determine_next_inventory, determine_next_time};
use tranche_env::synthesizer::determine_runtime;
use tranche_env::{EnvSpec, RandomPolicy, run_episode};
use tranche_types::{DEFAULT_QTY_TOLERANCE, EnvConfig, GridSpec};

mod common;
use common::{env_over, flat_book, small_config};

fn grid_spec() -> impl Strategy<Value = GridSpec> {
    (-100.0f64..100.0, 0.0f64..200.0, 0.01f64..50.0)
        .prop_map(|(min, width, step)| GridSpec::new(min, min + width, step))
}

proptest! {
    #[test]
    fn prop_grid_is_increasing_and_bounded(spec in grid_spec()) {
        let grid = Grid::build(spec).unwrap();
        prop_assert!(!grid.is_empty());
        prop_assert_eq!(grid.first(), spec.min);
        prop_assert!(grid.last() <= spec.max);
        for pair in grid.values().windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn prop_next_time_is_predecessor(spec in grid_spec(), pick in any::<prop::sample::Index>()) {
        let grid = Grid::build(spec).unwrap();
        let pos = pick.index(grid.len());
        let t = grid.values()[pos];
        let next = determine_next_time(t, &grid).unwrap();
        if pos == 0 {
            prop_assert_eq!(next, t);
        } else {
            prop_assert_eq!(next, grid.values()[pos - 1]);
        }
    }

    #[test]
    fn prop_runtime_is_bucket_width(spec in grid_spec(), pick in any::<prop::sample::Index>()) {
        let grid = Grid::build(spec).unwrap();
        let pos = pick.index(grid.len());
        let t = grid.values()[pos];
        let runtime = determine_runtime(t, &grid).unwrap();
        if pos == 0 {
            prop_assert_eq!(runtime, t);
        } else {
            prop_assert_eq!(runtime, grid.values()[pos] - grid.values()[pos - 1]);
        }
    }

    #[test]
    fn prop_next_inventory_is_nearest_or_zero(
        step in 0.05f64..0.5,
        q in 0.0f64..1.5,
    ) {
        let grid = Grid::build(GridSpec::new(0.0, 1.0, step)).unwrap();
        let next = determine_next_inventory(q, &grid, DEFAULT_QTY_TOLERANCE);
        if q <= DEFAULT_QTY_TOLERANCE {
            prop_assert_eq!(next, 0.0);
        } else {
            let best = std::iter::once(0.0)
                .chain(grid.values().iter().copied())
                .map(|x| (x - q).abs())
                .fold(f64::INFINITY, f64::min);
            prop_assert_eq!((next - q).abs(), best);
            prop_assert!(next == 0.0 || grid.position(next).is_some());
        }
    }

    #[test]
    fn prop_observation_shape_follows_lookback_and_depth(
        lookback in 1usize..6,
        book_size in 1usize..6,
    ) {
        let config = EnvConfig { lookback, book_size, ..small_config() };
        let spec = EnvSpec::new(config.clone()).unwrap();
        prop_assert_eq!(spec.observation_space().shape, [2 * lookback, book_size, 2]);

        let mut env = env_over(config, flat_book(60, 1.0));
        let obs = env.reset().unwrap();
        prop_assert_eq!(obs.features_shape(), [2 * lookback, book_size, 2]);
    }

    #[test]
    fn prop_done_iff_filled_or_no_inventory(
        seed in any::<u64>(),
        bid_qty in 0.05f64..1.0,
    ) {
        let mut env = env_over(small_config(), flat_book(80, bid_qty));
        env.seed(seed);
        let mut policy = RandomPolicy::new(seed);
        let summary = run_episode(&mut env, &mut policy, 10).unwrap();

        // Inventory grid (0, 0.5, 1): an open quantity up to 0.25 snaps to 0.0,
        // which also covers a full fill.
        let last = summary.records.last().unwrap();
        let remaining = env.execution().unwrap().qty_not_executed();
        prop_assert_eq!(last.done, remaining <= 0.25);
        prop_assert_eq!(last.done, summary.final_inventory == 0.0);
        for record in &summary.records[..summary.records.len() - 1] {
            prop_assert!(!record.done);
        }
    }
}
