//! Component library: the two registrable capability families.
//!
//! - `indicator`: numeric series derived from bar data or other indicators
//! - `rule`: boolean predicates over a bar index

pub mod indicator;
pub mod rule;

pub use indicator::{Indicator, IndicatorKind, IndicatorRegistry};
pub use rule::{Rule, RuleKind, RuleOperator, RuleRegistry};
