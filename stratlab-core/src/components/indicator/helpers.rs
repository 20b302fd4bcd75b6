//! Window extremes and arithmetic over other indicators.

use std::sync::Arc;

use crate::indicators::{rolling_max, rolling_min};
use crate::registry::{Component, Constructor, Param};

use super::{precomputed_indicator, Indicator, IndicatorKind};

/// Highest value of an indicator over the last `bar_count` bars.
#[derive(Debug, Clone)]
pub struct HighestValueIndicator {
    values: Vec<f64>,
}

impl HighestValueIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            values: rolling_max(input.series(), bar_count),
        }
    }
}

impl Component<IndicatorKind> for HighestValueIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

/// Lowest value of an indicator over the last `bar_count` bars.
#[derive(Debug, Clone)]
pub struct LowestValueIndicator {
    values: Vec<f64>,
}

impl LowestValueIndicator {
    pub fn new(input: &dyn Indicator, bar_count: usize) -> Self {
        Self {
            values: rolling_min(input.series(), bar_count),
        }
    }
}

impl Component<IndicatorKind> for LowestValueIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?.as_ref(), args.period(1)?))),
        )]
    }
}

/// first - second, bar by bar.
#[derive(Debug, Clone)]
pub struct DifferenceIndicator {
    values: Vec<f64>,
}

impl DifferenceIndicator {
    pub fn new(first: &dyn Indicator, second: &dyn Indicator) -> Self {
        Self {
            values: (0..first.len())
                .map(|i| first.value(i) - second.value(i))
                .collect(),
        }
    }
}

impl Component<IndicatorKind> for DifferenceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::indicator("first"), Param::indicator("second")],
            |args| {
                let (first, second) = (args.indicator(0)?, args.indicator(1)?);
                Ok(Arc::new(Self::new(first.as_ref(), second.as_ref())))
            },
        )]
    }
}

precomputed_indicator!(HighestValueIndicator, LowestValueIndicator, DifferenceIndicator);
