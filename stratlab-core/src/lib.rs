//! StratLab Core: dynamic construction of technical-analysis strategies.
//!
//! This crate turns declarative strategy configs into live predicates:
//! - Component registry keyed by lower-hyphen type names
//! - Constructor descriptors for discovery and UI listing
//! - Per-evaluation scoped caches of constants, series, indicators, rules
//! - Indicator and rule builders with overload resolution
//! - Strategy assembly with left-to-right AND/OR/XOR folding
//! - Bar series loading (CSV directory or in-memory)

pub mod assembler;
pub mod builder;
pub mod cache;
pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod registry;

pub use assembler::{fold_expression, AssembledStrategy, StrategyAssembler};
pub use cache::{EvaluationScope, Role, ScopeId, ScopedCache};
pub use components::{Indicator, IndicatorRegistry, Rule, RuleOperator, RuleRegistry};
pub use config::{load_strategy_config, StrategyConfig};
pub use error::{EngineError, ExpressionError, ExpressionSide};
