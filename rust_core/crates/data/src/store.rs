//! In-memory order book.

use tranche_types::BookSnapshot;

use crate::error::DataError;
use crate::source::OrderbookSource;
use crate::validation::validate_snapshots;

/// Validated, time-ordered sequence of order-book snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Orderbook {
    snapshots: Vec<BookSnapshot>,
}

impl Orderbook {
    /// Creates an order book after validating `snapshots`.
    ///
    /// # Errors
    /// Returns the first validation failure, see
    /// [`validate_snapshots`](crate::validation::validate_snapshots).
    pub fn new(snapshots: Vec<BookSnapshot>) -> Result<Self, DataError> {
        validate_snapshots(&snapshots)?;
        tracing::debug!(snapshots = snapshots.len(), "order book loaded");
        Ok(Self { snapshots })
    }

    /// All snapshots in time order.
    #[must_use]
    pub fn snapshots(&self) -> &[BookSnapshot] {
        &self.snapshots
    }

    /// Timestamp of the snapshot at `index`.
    #[must_use]
    pub fn timestamp_at(&self, index: usize) -> Option<i64> {
        self.snapshots.get(index).map(|s| s.timestamp_ns)
    }

    /// Total covered time span in nanoseconds.
    #[must_use]
    pub fn span_ns(&self) -> i64 {
        match (self.snapshots.first(), self.snapshots.last()) {
            (Some(first), Some(last)) => last.timestamp_ns - first.timestamp_ns,
            _ => 0,
        }
    }

    fn out_of_range(&self, index: usize) -> DataError {
        DataError::IndexOutOfRange {
            index,
            len: self.snapshots.len(),
        }
    }
}

impl OrderbookSource for Orderbook {
    fn len(&self) -> usize {
        self.snapshots.len()
    }

    fn state(&self, index: usize) -> Result<&BookSnapshot, DataError> {
        self.snapshots
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    fn state_mut(&mut self, index: usize) -> Result<&mut BookSnapshot, DataError> {
        let len = self.snapshots.len();
        self.snapshots
            .get_mut(index)
            .ok_or(DataError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tranche_types::BookLevel;

    fn book(n: usize) -> Orderbook {
        let snapshots = (0..n)
            .map(|k| {
                BookSnapshot::new(
                    i64::try_from(k).unwrap() * 1_000_000_000,
                    vec![BookLevel::new(99.0, 1.0)],
                    vec![BookLevel::new(101.0, 1.0)],
                )
            })
            .collect();
        Orderbook::new(snapshots).unwrap()
    }

    #[test]
    fn test_state_access() {
        let ob = book(3);
        assert_eq!(ob.len(), 3);
        assert!(!ob.is_empty());
        assert_eq!(ob.state(2).unwrap().timestamp_ns, 2_000_000_000);
        assert!(matches!(
            ob.state(3),
            Err(DataError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(ob.timestamp_at(1), Some(1_000_000_000));
        assert_eq!(ob.timestamp_at(3), None);
        assert_eq!(ob.span_ns(), 2_000_000_000);
    }

    #[test]
    fn test_clone_is_independent() {
        let ob = book(2);
        let mut copy = ob.clone();
        copy.state_mut(0).unwrap().bids.clear();
        assert_eq!(ob.state(0).unwrap().bids.len(), 1);
        assert!(copy.state(0).unwrap().bids.is_empty());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Orderbook::new(vec![]), Err(DataError::EmptyData)));
    }
}
