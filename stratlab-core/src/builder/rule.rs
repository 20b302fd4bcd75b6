//! Rule builder, including follow-up chains.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{EvaluationScope, Role};
use crate::components::rule::{Rule, RuleKind, RuleRegistry};
use crate::config::RuleConfig;
use crate::error::EngineError;
use crate::registry::ComponentKind;

use super::{construct, Target};

/// Roles a rule argument may reference.
const RULE_REFERENCES: &[Role] = &[
    Role::Constant,
    Role::BarSeries,
    Role::Indicator,
    Role::Rule,
    Role::TradingRecord,
];

/// Materializes named rules into an evaluation scope.
#[derive(Debug, Clone, Copy)]
pub struct RuleBuilder<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> RuleBuilder<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Build `config` and cache it under its name.
    ///
    /// Follow-up rules are built (and cached under their own names) after
    /// the base rule, then folded into it left to right; the combined rule
    /// is what gets cached under `config.name`.
    pub fn build(
        &self,
        config: &RuleConfig,
        scope: &mut EvaluationScope,
    ) -> Result<Arc<dyn Rule>, EngineError> {
        if let Some(existing) = scope.rules.get(&config.name) {
            debug!(name = %config.name, "rule already cached in scope");
            return Ok(Arc::clone(existing));
        }

        let target = Target {
            kind: RuleKind::NAME,
            key: &config.type_key,
            name: &config.name,
        };
        let mut rule = construct(self.registry, &target, &config.args, scope, RULE_REFERENCES)?;

        for follow_up in &config.follow_ups {
            let next = self.build(&follow_up.rule, scope)?;
            rule = follow_up.op.combine(rule, next);
        }

        debug!(
            name = %config.name,
            key = %config.type_key,
            follow_ups = config.follow_ups.len(),
            "built rule"
        );
        scope.rules.put(config.name.clone(), Arc::clone(&rule));
        Ok(rule)
    }
}
