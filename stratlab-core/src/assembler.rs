//! Strategy assembler: turns a [`StrategyConfig`] into entry/exit predicates.
//!
//! One synchronous pass per call:
//! 1. seed constants into the scope
//! 2. load declared bar series not already in the scope
//! 3. build indicators, in declared order
//! 4. build rules, in declared order
//! 5. fold the entry and exit token lists
//!
//! Any failure aborts the call; no partial strategy is returned. The scope
//! keeps whatever was built before the failure, and the caller decides
//! whether to `reset()` it.
//!
//! # Token folding
//! Token lists alternate rule names and operators (`AND`, `OR`, `XOR`) and
//! fold strictly left to right with no precedence and no grouping:
//! `[a, AND, b, OR, c]` is `(a AND b) OR c`, and `[a, OR, b, AND, c]` is
//! `(a OR b) AND c`.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use crate::builder::{IndicatorBuilder, RuleBuilder};
use crate::cache::{EvaluationScope, Role, ScopedCache};
use crate::components::indicator::IndicatorRegistry;
use crate::components::rule::{Rule, RuleOperator, RuleRegistry};
use crate::config::StrategyConfig;
use crate::data::BarSeriesLoader;
use crate::domain::{BarSeries, TradeDirection};
use crate::error::{EngineError, ExpressionError, ExpressionSide};

// ─── AssembledStrategy ───────────────────────────────────────────────

/// Entry and exit predicates plus trade direction.
///
/// Holds no reference to the scope it was built in.
#[derive(Debug, Clone)]
pub struct AssembledStrategy {
    name: String,
    direction: TradeDirection,
    entry: Arc<dyn Rule>,
    exit: Arc<dyn Rule>,
    series: Option<Arc<BarSeries>>,
}

impl AssembledStrategy {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn entry(&self) -> &Arc<dyn Rule> {
        &self.entry
    }

    pub fn exit(&self) -> &Arc<dyn Rule> {
        &self.exit
    }

    pub fn should_enter(&self, index: usize) -> bool {
        self.entry.is_satisfied(index)
    }

    pub fn should_exit(&self, index: usize) -> bool {
        self.exit.is_satisfied(index)
    }

    /// The series named by `trading_series`, if the config set one.
    pub fn series(&self) -> Option<&Arc<BarSeries>> {
        self.series.as_ref()
    }
}

// ─── Token folding ───────────────────────────────────────────────────

/// Fold a token list into one rule, strictly left to right.
pub fn fold_expression(
    tokens: &[String],
    side: ExpressionSide,
    rules: &ScopedCache<Arc<dyn Rule>>,
) -> Result<Arc<dyn Rule>, EngineError> {
    let invalid = |reason| EngineError::InvalidExpression { side, reason };

    let operand = |position: usize, token: &str| -> Result<Arc<dyn Rule>, EngineError> {
        if RuleOperator::from_token(token).is_some() {
            return Err(invalid(ExpressionError::OperatorAsOperand {
                position,
                token: token.to_string(),
            }));
        }
        rules
            .get(token)
            .cloned()
            .ok_or_else(|| EngineError::UnresolvedReference {
                role: Role::Rule,
                name: token.to_string(),
            })
    };

    let first = tokens.first().ok_or_else(|| invalid(ExpressionError::Empty))?;
    let mut folded = operand(0, first)?;

    let mut position = 1;
    while position < tokens.len() {
        let token = &tokens[position];
        let op = RuleOperator::from_token(token).ok_or_else(|| {
            invalid(ExpressionError::UnknownOperator {
                position,
                token: token.clone(),
            })
        })?;
        let next = tokens.get(position + 1).ok_or_else(|| {
            invalid(ExpressionError::DanglingOperator {
                position,
                token: token.clone(),
            })
        })?;
        folded = op.combine(folded, operand(position + 1, next)?);
        position += 2;
    }

    Ok(folded)
}

// ─── Assembler ───────────────────────────────────────────────────────

/// Orchestrates the builders over a strategy config.
///
/// Holds only shared, read-only collaborators; one assembler can serve many
/// concurrent scopes.
#[derive(Clone, Copy)]
pub struct StrategyAssembler<'a> {
    indicators: &'a IndicatorRegistry,
    rules: &'a RuleRegistry,
    loader: &'a dyn BarSeriesLoader,
}

impl<'a> StrategyAssembler<'a> {
    pub fn new(
        indicators: &'a IndicatorRegistry,
        rules: &'a RuleRegistry,
        loader: &'a dyn BarSeriesLoader,
    ) -> Self {
        Self {
            indicators,
            rules,
            loader,
        }
    }

    /// Assemble `config` inside `scope`.
    pub fn assemble(
        &self,
        config: &StrategyConfig,
        scope: &mut EvaluationScope,
    ) -> Result<AssembledStrategy, EngineError> {
        let span = info_span!("assemble", scope = %scope.id(), strategy = %config.strategy_name);
        let _guard = span.enter();

        let result = self.run(config, scope);
        match &result {
            Ok(strategy) => info!(
                direction = %strategy.direction(),
                indicators = config.indicators.len(),
                rules = config.rules.len(),
                "strategy assembled"
            ),
            Err(error) => warn!(%error, "strategy assembly failed"),
        }
        result
    }

    /// Assemble `config` in a fresh scope that is dropped afterwards.
    pub fn assemble_isolated(
        &self,
        config: &StrategyConfig,
    ) -> Result<AssembledStrategy, EngineError> {
        self.assemble(config, &mut EvaluationScope::new())
    }

    fn run(
        &self,
        config: &StrategyConfig,
        scope: &mut EvaluationScope,
    ) -> Result<AssembledStrategy, EngineError> {
        for (name, value) in &config.constants {
            scope.constants.put(name.clone(), value.clone());
        }

        for series_config in &config.bar_series {
            if scope.bar_series.contains(&series_config.name) {
                debug!(series = %series_config.name, "bar series already in scope");
                continue;
            }
            let series = self
                .loader
                .load(series_config)
                .map_err(|source| EngineError::BarSeriesLoad {
                    name: series_config.name.clone(),
                    source,
                })?;
            debug!(series = %series_config.name, bars = series.len(), "loaded bar series");
            scope
                .bar_series
                .put(series_config.name.clone(), Arc::new(series));
        }

        let indicator_builder = IndicatorBuilder::new(self.indicators);
        for indicator in &config.indicators {
            indicator_builder.build(indicator, scope)?;
        }

        let rule_builder = RuleBuilder::new(self.rules);
        for rule in &config.rules {
            rule_builder.build(rule, scope)?;
        }

        let entry = fold_expression(&config.entry, ExpressionSide::Entry, &scope.rules)?;
        let exit = fold_expression(&config.exit, ExpressionSide::Exit, &scope.rules)?;

        let series = match &config.trading_series {
            Some(name) => Some(scope.bar_series.get(name).cloned().ok_or_else(|| {
                EngineError::UnresolvedReference {
                    role: Role::BarSeries,
                    name: name.clone(),
                }
            })?),
            None => None,
        };

        Ok(AssembledStrategy {
            name: config.strategy_name.clone(),
            direction: config.direction,
            entry,
            exit,
            series,
        })
    }
}
