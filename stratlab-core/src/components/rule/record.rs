//! Rules that read the live trading record.
//!
//! The record handle is shared with the caller's bar walker; these rules
//! take a read lock at evaluation time and are unsatisfied while flat.

use std::sync::Arc;

use crate::components::indicator::Indicator;
use crate::domain::{TradeDirection, TradingRecordHandle};
use crate::error::ConstructionError;
use crate::registry::{Component, Constructor, Param, ResolvedArgs};

use super::{Rule, RuleKind};

/// Signed move of `price` from the open position's entry, in percent,
/// positive when in the position's favor.
fn favorable_move_pct(record: &TradingRecordHandle, price: f64) -> Option<f64> {
    let record = record.read();
    let entry = record.open_position()?.entry_price;
    if entry == 0.0 || price.is_nan() {
        return None;
    }
    let pct = (price - entry) / entry * 100.0;
    Some(match record.direction() {
        TradeDirection::Buy => pct,
        TradeDirection::Sell => -pct,
    })
}

fn percentage(args: &ResolvedArgs) -> Result<f64, ConstructionError> {
    let pct = args.num(2)?;
    if pct.is_nan() || pct < 0.0 {
        return Err(ConstructionError::InvalidArgument {
            name: "percentage",
            reason: format!("must be a non-negative percentage, got {pct}"),
        });
    }
    Ok(pct)
}

fn record_params() -> Vec<Param> {
    vec![
        Param::indicator("price"),
        Param::trading_record("record"),
        Param::num("percentage"),
    ]
}

/// The open position has lost at least `percentage` percent.
#[derive(Debug, Clone)]
pub struct StopLossRule {
    price: Arc<dyn Indicator>,
    record: TradingRecordHandle,
    percentage: f64,
}

impl StopLossRule {
    pub fn new(price: Arc<dyn Indicator>, record: TradingRecordHandle, percentage: f64) -> Self {
        Self {
            price,
            record,
            percentage,
        }
    }
}

impl Rule for StopLossRule {
    fn is_satisfied(&self, index: usize) -> bool {
        favorable_move_pct(&self.record, self.price.value(index))
            .is_some_and(|pct| pct <= -self.percentage)
    }
}

impl Component<RuleKind> for StopLossRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(record_params(), |args| {
            Ok(Arc::new(Self::new(
                args.indicator(0)?,
                args.trading_record(1)?,
                percentage(args)?,
            )))
        })]
    }
}

/// The open position has gained at least `percentage` percent.
#[derive(Debug, Clone)]
pub struct StopGainRule {
    price: Arc<dyn Indicator>,
    record: TradingRecordHandle,
    percentage: f64,
}

impl StopGainRule {
    pub fn new(price: Arc<dyn Indicator>, record: TradingRecordHandle, percentage: f64) -> Self {
        Self {
            price,
            record,
            percentage,
        }
    }
}

impl Rule for StopGainRule {
    fn is_satisfied(&self, index: usize) -> bool {
        favorable_move_pct(&self.record, self.price.value(index))
            .is_some_and(|pct| pct >= self.percentage)
    }
}

impl Component<RuleKind> for StopGainRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(record_params(), |args| {
            Ok(Arc::new(Self::new(
                args.indicator(0)?,
                args.trading_record(1)?,
                percentage(args)?,
            )))
        })]
    }
}
