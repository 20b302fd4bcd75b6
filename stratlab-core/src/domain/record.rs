//! Trading record: position state shared between a bar walker and
//! record-dependent rules.
//!
//! Only tracks entries and exits; no profit accounting.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::TradeDirection;

/// Shared, live handle to a trading record.
///
/// The caller mutates it while walking bars; rules holding a clone read it
/// at evaluation time.
pub type TradingRecordHandle = Arc<RwLock<TradingRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_index: usize,
    pub entry_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingRecord {
    direction: TradeDirection,
    open_position: Option<OpenPosition>,
    closed_positions: Vec<ClosedPosition>,
}

impl TradingRecord {
    pub fn new(direction: TradeDirection) -> Self {
        Self {
            direction,
            open_position: None,
            closed_positions: Vec::new(),
        }
    }

    /// Wrap a fresh record in a shareable handle.
    pub fn shared(direction: TradeDirection) -> TradingRecordHandle {
        Arc::new(RwLock::new(Self::new(direction)))
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn is_open(&self) -> bool {
        self.open_position.is_some()
    }

    pub fn open_position(&self) -> Option<&OpenPosition> {
        self.open_position.as_ref()
    }

    pub fn closed_positions(&self) -> &[ClosedPosition] {
        &self.closed_positions
    }

    /// Open a position. Returns false (no-op) if one is already open.
    pub fn enter(&mut self, index: usize, price: f64) -> bool {
        if self.open_position.is_some() {
            return false;
        }
        self.open_position = Some(OpenPosition {
            entry_index: index,
            entry_price: price,
        });
        true
    }

    /// Close the open position. Returns false (no-op) if none is open.
    pub fn exit(&mut self, index: usize, price: f64) -> bool {
        match self.open_position.take() {
            Some(open) => {
                self.closed_positions.push(ClosedPosition {
                    entry_index: open.entry_index,
                    entry_price: open.entry_price,
                    exit_index: index,
                    exit_price: price,
                });
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_then_exit_closes_position() {
        let mut record = TradingRecord::new(TradeDirection::Buy);
        assert!(!record.is_open());
        assert!(record.enter(3, 100.0));
        assert!(record.is_open());
        assert!(!record.enter(4, 101.0), "second entry while open is ignored");
        assert!(record.exit(6, 110.0));
        assert!(!record.is_open());
        assert_eq!(
            record.closed_positions(),
            &[ClosedPosition {
                entry_index: 3,
                entry_price: 100.0,
                exit_index: 6,
                exit_price: 110.0,
            }]
        );
    }

    #[test]
    fn exit_without_position_is_noop() {
        let mut record = TradingRecord::new(TradeDirection::Sell);
        assert!(!record.exit(1, 1.0));
        assert!(record.closed_positions().is_empty());
    }

    #[test]
    fn shared_handle_is_visible_to_clones() {
        let handle = TradingRecord::shared(TradeDirection::Buy);
        let reader = Arc::clone(&handle);
        handle.write().enter(0, 50.0);
        assert_eq!(reader.read().open_position().map(|p| p.entry_price), Some(50.0));
    }
}
