use proptest::prelude::*;

use tranche_data::{Orderbook, OrderbookSource};
use tranche_execution::{BookWalkMatcher, Execution, MatchEngine};
use tranche_types::{
    BookLevel, BookSnapshot, DiscretizedState, FeatureTensor, OrderRequest, OrderSide,
    total_quantity,
};

fn book(mids: &[f64], qty: f64) -> Orderbook {
    let snapshots = mids
        .iter()
        .enumerate()
        .map(|(k, &mid)| {
            BookSnapshot::new(
                k as i64 * 1_000_000_000,
                (1..=3).map(|d| BookLevel::new(mid - d as f64, qty)).collect(),
                (1..=3).map(|d| BookLevel::new(mid + d as f64, qty)).collect(),
            )
        })
        .collect();
    Orderbook::new(snapshots).unwrap()
}

fn execution(ob: &Orderbook, order: OrderRequest, runtime: f64) -> Execution {
    let state = DiscretizedState::new(runtime, order.quantity(), FeatureTensor::zeros([2, 1, 2]));
    Execution::new(None, runtime, state, order, ob.state(0).unwrap().clone(), 0).unwrap()
}

proptest! {
    #[test]
    fn prop_limit_fills_respect_price_and_quantity(
        mids in prop::collection::vec(90.0f64..110.0, 2..10),
        qty in 0.01f64..2.0,
        level_qty in 0.05f64..1.0,
        limit in 85.0f64..115.0,
        runtime in 0.0f64..12.0,
        sell in any::<bool>(),
    ) {
        let side = if sell { OrderSide::Sell } else { OrderSide::Buy };
        let ob = book(&mids, level_qty);
        let mut exec = execution(&ob, OrderRequest::limit(side, qty, limit), runtime);

        let fills = BookWalkMatcher::new().run(&mut exec, ob.clone()).unwrap();

        prop_assert!(total_quantity(&fills) <= qty + 1e-9);
        for fill in &fills {
            prop_assert_eq!(fill.side, side);
            match side {
                OrderSide::Sell => prop_assert!(fill.price >= limit),
                OrderSide::Buy => prop_assert!(fill.price <= limit),
            }
        }
        let window = ob.index_window(0, runtime).unwrap();
        prop_assert!(window.contains(&exec.orderbook_index()));
    }

    #[test]
    fn prop_market_fills_until_liquidity_runs_out(
        mids in prop::collection::vec(90.0f64..110.0, 1..6),
        qty in 0.01f64..20.0,
    ) {
        let ob = book(&mids, 1.0);
        let mut exec = execution(&ob, OrderRequest::market(OrderSide::Sell, qty), 0.0);

        let fills = BookWalkMatcher::new().run(&mut exec, ob.clone()).unwrap();
        let filled = total_quantity(&fills);

        // Each snapshot offers 3.0 in total; at least the first one is fully available.
        prop_assert!(filled >= qty.min(3.0) - 1e-9);
        prop_assert!(filled <= qty + 1e-9);
    }
}
