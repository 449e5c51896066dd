use tranche_data::Orderbook;
use tranche_types::{BookLevel, BookSnapshot};

pub const SECOND_NS: i64 = 1_000_000_000;

/// Symmetric ladder around `mid` with one-unit tick spacing.
pub fn ladder(ts: i64, mid: f64, depth: usize, qty: f64) -> BookSnapshot {
    let bids = (0..depth)
        .map(|k| BookLevel::new(mid - 1.0 - k as f64, qty))
        .collect();
    let asks = (0..depth)
        .map(|k| BookLevel::new(mid + 1.0 + k as f64, qty))
        .collect();
    BookSnapshot::new(ts, bids, asks)
}

/// `n` snapshots one second apart, mid drifting up by `drift` per snapshot.
pub fn drifting_book(n: usize, drift: f64) -> Orderbook {
    let snapshots = (0..n)
        .map(|k| ladder(k as i64 * SECOND_NS, 100.0 + drift * k as f64, 5, 1.0))
        .collect();
    Orderbook::new(snapshots).unwrap()
}
