//! Volatility measures bound to a bar series.

use std::sync::Arc;

use crate::domain::BarSeries;
use crate::indicators::atr_of_bars;
use crate::registry::{Component, Constructor, Param};

use super::{precomputed_indicator, IndicatorKind};

/// Average true range with Wilder smoothing.
#[derive(Debug, Clone)]
pub struct AtrIndicator {
    values: Vec<f64>,
}

impl AtrIndicator {
    pub fn new(series: &BarSeries, bar_count: usize) -> Self {
        Self {
            values: atr_of_bars(series.bars(), bar_count),
        }
    }
}

impl Component<IndicatorKind> for AtrIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::bar_series("series"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(&*args.bar_series(0)?, args.period(1)?))),
        )]
    }
}

precomputed_indicator!(AtrIndicator);
