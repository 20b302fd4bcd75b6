//! Rules over a trailing window of an indicator.

use std::sync::Arc;

use crate::components::indicator::Indicator;
use crate::registry::{Component, Constructor, Param};

use super::{Rule, RuleKind};

/// Values of the trailing window ending at `index`, clamped at bar 0.
/// `None` if any value in the window is NaN.
fn window(indicator: &dyn Indicator, index: usize, bar_count: usize) -> Option<Vec<f64>> {
    let start = (index + 1).saturating_sub(bar_count);
    let values: Vec<f64> = (start..=index).map(|i| indicator.value(i)).collect();
    if values.iter().any(|v| v.is_nan()) {
        None
    } else {
        Some(values)
    }
}

/// The indicator is at its highest value of the last `bar_count` bars.
#[derive(Debug, Clone)]
pub struct IsHighestRule {
    indicator: Arc<dyn Indicator>,
    bar_count: usize,
}

impl IsHighestRule {
    pub fn new(indicator: Arc<dyn Indicator>, bar_count: usize) -> Self {
        Self {
            indicator,
            bar_count,
        }
    }
}

impl Rule for IsHighestRule {
    fn is_satisfied(&self, index: usize) -> bool {
        let current = self.indicator.value(index);
        window(self.indicator.as_ref(), index, self.bar_count)
            .is_some_and(|w| w.iter().all(|&v| v <= current))
    }
}

impl Component<RuleKind> for IsHighestRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?, args.period(1)?))),
        )]
    }
}

/// The indicator is at its lowest value of the last `bar_count` bars.
#[derive(Debug, Clone)]
pub struct IsLowestRule {
    indicator: Arc<dyn Indicator>,
    bar_count: usize,
}

impl IsLowestRule {
    pub fn new(indicator: Arc<dyn Indicator>, bar_count: usize) -> Self {
        Self {
            indicator,
            bar_count,
        }
    }
}

impl Rule for IsLowestRule {
    fn is_satisfied(&self, index: usize) -> bool {
        let current = self.indicator.value(index);
        window(self.indicator.as_ref(), index, self.bar_count)
            .is_some_and(|w| w.iter().all(|&v| v >= current))
    }
}

impl Component<RuleKind> for IsLowestRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?, args.period(1)?))),
        )]
    }
}

/// Strictly increasing over each of the last `bar_count` steps.
#[derive(Debug, Clone)]
pub struct IsRisingRule {
    indicator: Arc<dyn Indicator>,
    bar_count: usize,
}

impl IsRisingRule {
    pub fn new(indicator: Arc<dyn Indicator>, bar_count: usize) -> Self {
        Self {
            indicator,
            bar_count,
        }
    }
}

impl Rule for IsRisingRule {
    fn is_satisfied(&self, index: usize) -> bool {
        index >= self.bar_count
            && window(self.indicator.as_ref(), index, self.bar_count + 1)
                .is_some_and(|w| w.windows(2).all(|pair| pair[1] > pair[0]))
    }
}

impl Component<RuleKind> for IsRisingRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?, args.period(1)?))),
        )]
    }
}

/// Strictly decreasing over each of the last `bar_count` steps.
#[derive(Debug, Clone)]
pub struct IsFallingRule {
    indicator: Arc<dyn Indicator>,
    bar_count: usize,
}

impl IsFallingRule {
    pub fn new(indicator: Arc<dyn Indicator>, bar_count: usize) -> Self {
        Self {
            indicator,
            bar_count,
        }
    }
}

impl Rule for IsFallingRule {
    fn is_satisfied(&self, index: usize) -> bool {
        index >= self.bar_count
            && window(self.indicator.as_ref(), index, self.bar_count + 1)
                .is_some_and(|w| w.windows(2).all(|pair| pair[1] < pair[0]))
    }
}

impl Component<RuleKind> for IsFallingRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::indicator("indicator"), Param::int("bar_count")],
            |args| Ok(Arc::new(Self::new(args.indicator(0)?, args.period(1)?))),
        )]
    }
}
