//! Moving averages of another indicator.

use std::sync::Arc;

use crate::indicators::{ema_of_series, sma_of_series};
use crate::registry::{Component, Constructor, Param};

use super::{precomputed_indicator, Indicator, IndicatorKind};

#[derive(Debug, Clone)]
pub struct SmaIndicator {
    bar_count: usize,
    values: Vec<f64>,
}

impl SmaIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            bar_count,
            values: sma_of_series(input.series(), bar_count),
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }
}

impl Component<IndicatorKind> for SmaIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

#[derive(Debug, Clone)]
pub struct EmaIndicator {
    bar_count: usize,
    values: Vec<f64>,
}

impl EmaIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            bar_count,
            values: ema_of_series(input.series(), bar_count),
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }
}

impl Component<IndicatorKind> for EmaIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

precomputed_indicator!(SmaIndicator, EmaIndicator);
