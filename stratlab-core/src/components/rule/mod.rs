//! Rule capability and the built-in rule kinds.
//!
//! A rule is a boolean predicate over a bar index. Rules hold their inputs
//! (indicators, other rules, trading-record handles) and never see the
//! evaluation scope.

pub mod combinators;
pub mod comparison;
pub mod record;
pub mod window;

pub use combinators::{AndRule, BooleanRule, NotRule, OrRule, RuleOperator, XorRule};
pub use comparison::{
    CrossedDownIndicatorRule, CrossedUpIndicatorRule, InPipeRule, OverIndicatorRule,
    UnderIndicatorRule,
};
pub use record::{StopGainRule, StopLossRule};
pub use window::{IsFallingRule, IsHighestRule, IsLowestRule, IsRisingRule};

use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::{ComponentKind, ComponentRegistry};

pub trait Rule: Send + Sync + fmt::Debug {
    /// Whether the rule holds at bar `index`.
    fn is_satisfied(&self, index: usize) -> bool;
}

/// The rule component kind.
#[derive(Debug, Clone, Copy)]
pub struct RuleKind;

impl ComponentKind for RuleKind {
    const NAME: &'static str = "rule";
    type Output = Arc<dyn Rule>;
}

pub type RuleRegistry = ComponentRegistry<RuleKind>;

/// Registry of every built-in rule.
pub fn default_registry() -> Result<RuleRegistry, RegistryError> {
    RuleRegistry::builder()
        .register::<AndRule>()
        .register::<OrRule>()
        .register::<XorRule>()
        .register::<NotRule>()
        .register::<BooleanRule>()
        .register::<OverIndicatorRule>()
        .register::<UnderIndicatorRule>()
        .register::<CrossedUpIndicatorRule>()
        .register::<CrossedDownIndicatorRule>()
        .register::<InPipeRule>()
        .register::<IsHighestRule>()
        .register::<IsLowestRule>()
        .register::<IsRisingRule>()
        .register::<IsFallingRule>()
        .register::<StopLossRule>()
        .register::<StopGainRule>()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_keys() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 16);
        assert!(registry.contains("and-rule"));
        assert!(registry.contains("crossed-up-indicator-rule"));
        assert!(registry.contains("stop-loss-rule"));
    }

    #[test]
    fn threshold_rule_constructs_through_the_registry() {
        use crate::components::indicator::{ConstantIndicator, Indicator};
        use crate::domain::BarSeries;
        use crate::registry::{ArgInput, ArgValue};

        let series = BarSeries::from_closes("t", &[1.0, 2.0, 3.0]);
        let level: Arc<dyn Indicator> = Arc::new(ConstantIndicator::new(&series, 5.0));
        let over = default_registry()
            .unwrap()
            .type_for("over-indicator-rule")
            .unwrap()
            .construct(&[ArgInput::Value(ArgValue::Indicator(level)), ArgInput::Text("4".into())])
            .unwrap();
        assert!(over.is_satisfied(0));
        assert!(over.is_satisfied(2));
    }

    #[test]
    fn threshold_overload_is_described() {
        let info = default_registry()
            .unwrap()
            .info_for("over-indicator-rule")
            .unwrap();
        let signatures: Vec<String> = info.constructors.iter().map(|c| c.signature()).collect();
        assert_eq!(
            signatures,
            vec![
                "(indicator first, indicator second)",
                "(indicator indicator, num threshold)"
            ]
        );
    }
}
