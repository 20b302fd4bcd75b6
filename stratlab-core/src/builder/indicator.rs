//! Indicator builder.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{EvaluationScope, Role};
use crate::components::indicator::{Indicator, IndicatorKind, IndicatorRegistry};
use crate::config::IndicatorConfig;
use crate::error::EngineError;
use crate::registry::ComponentKind;

use super::{construct, Target};

/// Roles an indicator argument may reference.
const INDICATOR_REFERENCES: &[Role] = &[Role::Constant, Role::BarSeries, Role::Indicator];

/// Materializes named indicators into an evaluation scope.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorBuilder<'a> {
    registry: &'a IndicatorRegistry,
}

impl<'a> IndicatorBuilder<'a> {
    pub fn new(registry: &'a IndicatorRegistry) -> Self {
        Self { registry }
    }

    /// Build `config` and cache it under its name.
    ///
    /// If the scope already holds an indicator with that name, the cached
    /// instance is returned unchanged.
    pub fn build(
        &self,
        config: &IndicatorConfig,
        scope: &mut EvaluationScope,
    ) -> Result<Arc<dyn Indicator>, EngineError> {
        if let Some(existing) = scope.indicators.get(&config.name) {
            debug!(name = %config.name, "indicator already cached in scope");
            return Ok(Arc::clone(existing));
        }

        let target = Target {
            kind: IndicatorKind::NAME,
            key: &config.type_key,
            name: &config.name,
        };
        let indicator = construct(
            self.registry,
            &target,
            &config.args,
            scope,
            INDICATOR_REFERENCES,
        )?;

        debug!(
            name = %config.name,
            key = %config.type_key,
            unstable_bars = indicator.unstable_bars(),
            "built indicator"
        );
        scope
            .indicators
            .put(config.name.clone(), Arc::clone(&indicator));
        Ok(indicator)
    }
}
