//! Indicator and rule builders.
//!
//! Both builders share one algorithm: resolve the type key in the registry,
//! resolve every argument against the evaluation scope (references must
//! already exist; forward references fail), pick the first constructor
//! whose parameters accept the arguments, construct, and cache the instance
//! under its declared name.

pub mod indicator;
pub mod rule;

pub use indicator::IndicatorBuilder;
pub use rule::RuleBuilder;

use std::sync::Arc;

use crate::cache::{EvaluationScope, Role};
use crate::config::ArgConfig;
use crate::error::{ConstructionError, EngineError};
use crate::registry::{ArgInput, ArgValue, ComponentKind, ComponentRegistry};

/// Identifies the component being built, for error reporting.
pub(crate) struct Target<'a> {
    pub kind: &'static str,
    pub key: &'a str,
    pub name: &'a str,
}

impl Target<'_> {
    fn construction_error(&self, source: ConstructionError) -> EngineError {
        EngineError::ComponentConstruction {
            kind: self.kind,
            key: self.key.to_string(),
            name: self.name.to_string(),
            source,
        }
    }
}

fn unresolved(role: Role, name: &str) -> EngineError {
    EngineError::UnresolvedReference {
        role,
        name: name.to_string(),
    }
}

/// Look up every reference in `scope`. Literals and constants stay text.
pub(crate) fn resolve_inputs(
    args: &[ArgConfig],
    scope: &EvaluationScope,
    allowed: &[Role],
    target: &Target<'_>,
) -> Result<Vec<ArgInput>, EngineError> {
    args.iter()
        .map(|arg| {
            let (role, name) = match arg {
                ArgConfig::Literal(text) => return Ok(ArgInput::Text(text.clone())),
                ArgConfig::Constant(name) => (Role::Constant, name),
                ArgConfig::Indicator(name) => (Role::Indicator, name),
                ArgConfig::BarSeries(name) => (Role::BarSeries, name),
                ArgConfig::Rule(name) => (Role::Rule, name),
                ArgConfig::TradingRecord(name) => (Role::TradingRecord, name),
            };
            if !allowed.contains(&role) {
                return Err(target.construction_error(ConstructionError::UnsupportedReference {
                    role,
                    kind: target.kind,
                }));
            }
            let found = match role {
                Role::Constant => scope
                    .constants
                    .get(name)
                    .map(|text| ArgInput::Text(text.clone())),
                Role::Indicator => scope
                    .indicators
                    .get(name)
                    .map(|v| ArgInput::Value(ArgValue::Indicator(Arc::clone(v)))),
                Role::BarSeries => scope
                    .bar_series
                    .get(name)
                    .map(|v| ArgInput::Value(ArgValue::BarSeries(Arc::clone(v)))),
                Role::Rule => scope
                    .rules
                    .get(name)
                    .map(|v| ArgInput::Value(ArgValue::Rule(Arc::clone(v)))),
                Role::TradingRecord => scope
                    .trading_records
                    .get(name)
                    .map(|v| ArgInput::Value(ArgValue::TradingRecord(Arc::clone(v)))),
            };
            found.ok_or_else(|| unresolved(role, name))
        })
        .collect()
}

/// Registry lookup, argument resolution and construction, without caching.
pub(crate) fn construct<K: ComponentKind>(
    registry: &ComponentRegistry<K>,
    target: &Target<'_>,
    args: &[ArgConfig],
    scope: &EvaluationScope,
    allowed: &[Role],
) -> Result<K::Output, EngineError> {
    let component = registry.type_for(target.key)?;
    let inputs = resolve_inputs(args, scope, allowed, target)?;
    component
        .construct(&inputs)
        .map_err(|source| target.construction_error(source))
}
