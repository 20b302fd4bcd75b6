//! Domain types: bars, bar series, trade direction, trading record.

pub mod bar;
pub mod record;
pub mod series;

pub use bar::Bar;
pub use record::{ClosedPosition, OpenPosition, TradingRecord, TradingRecordHandle};
pub use series::{BarSeries, Interval};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a strategy trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}
