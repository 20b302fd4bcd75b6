//! Indicator comparisons: over/under, crosses, and a value band.
//!
//! Each binary comparison has two overloads: against a second indicator, or
//! against a fixed `num` threshold. NaN on either side never satisfies.

use std::sync::Arc;

use crate::components::indicator::Indicator;
use crate::registry::{Component, Constructor, Param, ResolvedArgs};
use crate::error::ConstructionError;

use super::{Rule, RuleKind};

/// Right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Indicator(Arc<dyn Indicator>),
    Threshold(f64),
}

impl Operand {
    pub fn value(&self, index: usize) -> f64 {
        match self {
            Self::Indicator(ind) => ind.value(index),
            Self::Threshold(v) => *v,
        }
    }
}

/// `(indicator first, indicator second)` and `(indicator indicator, num threshold)`.
fn comparison_constructors(
    against_indicator: fn(&ResolvedArgs) -> Result<Arc<dyn Rule>, ConstructionError>,
    against_threshold: fn(&ResolvedArgs) -> Result<Arc<dyn Rule>, ConstructionError>,
) -> Vec<Constructor<RuleKind>> {
    vec![
        Constructor::<RuleKind>::new(
            vec![Param::indicator("first"), Param::indicator("second")],
            against_indicator,
        ),
        Constructor::<RuleKind>::new(
            vec![Param::indicator("indicator"), Param::num("threshold")],
            against_threshold,
        ),
    ]
}

fn operands(args: &ResolvedArgs) -> Result<(Arc<dyn Indicator>, Operand), ConstructionError> {
    let first = args.indicator(0)?;
    let second = match args.indicator(1) {
        Ok(ind) => Operand::Indicator(ind),
        Err(_) => Operand::Threshold(args.num(1)?),
    };
    Ok((first, second))
}

/// True at `index` when `a` crossed above `b`: `a > b` now, and at the most
/// recent earlier bar where they differed, `a < b`. A run of equal bars that
/// reaches bar 0 is not a cross.
fn crossed_above(a: &dyn Fn(usize) -> f64, b: &dyn Fn(usize) -> f64, index: usize) -> bool {
    let (now_a, now_b) = (a(index), b(index));
    if index == 0 || now_a.is_nan() || now_b.is_nan() || now_a <= now_b {
        return false;
    }
    let mut i = index - 1;
    if a(i) < b(i) {
        return true;
    }
    while i > 0 && a(i) == b(i) {
        i -= 1;
    }
    i != 0 && a(i) < b(i)
}

// ─── Over / Under ────────────────────────────────────────────────────

/// first > second
#[derive(Debug, Clone)]
pub struct OverIndicatorRule {
    first: Arc<dyn Indicator>,
    second: Operand,
}

impl OverIndicatorRule {
    pub fn new(first: Arc<dyn Indicator>, second: Operand) -> Self {
        Self { first, second }
    }
}

impl Rule for OverIndicatorRule {
    fn is_satisfied(&self, index: usize) -> bool {
        self.first.value(index) > self.second.value(index)
    }
}

impl Component<RuleKind> for OverIndicatorRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        let build = |args: &ResolvedArgs| -> Result<Arc<dyn Rule>, ConstructionError> {
            let (first, second) = operands(args)?;
            Ok(Arc::new(Self::new(first, second)))
        };
        comparison_constructors(build, build)
    }
}

/// first < second
#[derive(Debug, Clone)]
pub struct UnderIndicatorRule {
    first: Arc<dyn Indicator>,
    second: Operand,
}

impl UnderIndicatorRule {
    pub fn new(first: Arc<dyn Indicator>, second: Operand) -> Self {
        Self { first, second }
    }
}

impl Rule for UnderIndicatorRule {
    fn is_satisfied(&self, index: usize) -> bool {
        self.first.value(index) < self.second.value(index)
    }
}

impl Component<RuleKind> for UnderIndicatorRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        let build = |args: &ResolvedArgs| -> Result<Arc<dyn Rule>, ConstructionError> {
            let (first, second) = operands(args)?;
            Ok(Arc::new(Self::new(first, second)))
        };
        comparison_constructors(build, build)
    }
}

// ─── Crosses ─────────────────────────────────────────────────────────

/// first crosses above second at this bar.
#[derive(Debug, Clone)]
pub struct CrossedUpIndicatorRule {
    first: Arc<dyn Indicator>,
    second: Operand,
}

impl CrossedUpIndicatorRule {
    pub fn new(first: Arc<dyn Indicator>, second: Operand) -> Self {
        Self { first, second }
    }
}

impl Rule for CrossedUpIndicatorRule {
    fn is_satisfied(&self, index: usize) -> bool {
        crossed_above(
            &|i| self.first.value(i),
            &|i| self.second.value(i),
            index,
        )
    }
}

impl Component<RuleKind> for CrossedUpIndicatorRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        let build = |args: &ResolvedArgs| -> Result<Arc<dyn Rule>, ConstructionError> {
            let (first, second) = operands(args)?;
            Ok(Arc::new(Self::new(first, second)))
        };
        comparison_constructors(build, build)
    }
}

/// first crosses below second at this bar.
#[derive(Debug, Clone)]
pub struct CrossedDownIndicatorRule {
    first: Arc<dyn Indicator>,
    second: Operand,
}

impl CrossedDownIndicatorRule {
    pub fn new(first: Arc<dyn Indicator>, second: Operand) -> Self {
        Self { first, second }
    }
}

impl Rule for CrossedDownIndicatorRule {
    fn is_satisfied(&self, index: usize) -> bool {
        crossed_above(
            &|i| self.second.value(i),
            &|i| self.first.value(i),
            index,
        )
    }
}

impl Component<RuleKind> for CrossedDownIndicatorRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        let build = |args: &ResolvedArgs| -> Result<Arc<dyn Rule>, ConstructionError> {
            let (first, second) = operands(args)?;
            Ok(Arc::new(Self::new(first, second)))
        };
        comparison_constructors(build, build)
    }
}

// ─── Band ────────────────────────────────────────────────────────────

/// lower <= indicator <= upper
#[derive(Debug, Clone)]
pub struct InPipeRule {
    indicator: Arc<dyn Indicator>,
    upper: f64,
    lower: f64,
}

impl InPipeRule {
    pub fn new(indicator: Arc<dyn Indicator>, upper: f64, lower: f64) -> Self {
        Self {
            indicator,
            upper,
            lower,
        }
    }
}

impl Rule for InPipeRule {
    fn is_satisfied(&self, index: usize) -> bool {
        let v = self.indicator.value(index);
        v >= self.lower && v <= self.upper
    }
}

impl Component<RuleKind> for InPipeRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![
                Param::indicator("indicator"),
                Param::num("upper"),
                Param::num("lower"),
            ],
            |args| {
                let (upper, lower) = (args.num(1)?, args.num(2)?);
                if lower > upper {
                    return Err(ConstructionError::InvalidArgument {
                        name: "lower",
                        reason: format!("{lower} is above upper bound {upper}"),
                    });
                }
                Ok(Arc::new(Self::new(args.indicator(0)?, upper, lower)))
            },
        )]
    }
}
