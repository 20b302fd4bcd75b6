//! Momentum oscillators over another indicator.

use std::sync::Arc;

use crate::indicators::{roc_of_series, rsi_of_series};
use crate::registry::{Component, Constructor, Param};

use super::{precomputed_indicator, Indicator, IndicatorKind};

/// Wilder RSI, bounded to [0, 100].
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    values: Vec<f64>,
}

impl RsiIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            values: rsi_of_series(input.series(), bar_count),
        }
    }
}

impl Component<IndicatorKind> for RsiIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

/// Percentage rate of change over `bar_count` bars.
#[derive(Debug, Clone)]
pub struct RocIndicator {
    values: Vec<f64>,
}

impl RocIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            values: roc_of_series(input.series(), bar_count),
        }
    }
}

impl Component<IndicatorKind> for RocIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

precomputed_indicator!(RsiIndicator, RocIndicator);
