//! Error taxonomy for registry construction and strategy assembly.
//!
//! Every assembly failure is a deterministic consequence of the
//! configuration; nothing here is retryable.

use std::fmt;
use thiserror::Error;

use crate::cache::Role;
use crate::data::LoadError;

/// Which token list of a strategy an expression error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionSide {
    Entry,
    Exit,
}

impl fmt::Display for ExpressionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Structural defects of an entry/exit token list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("token list is empty")]
    Empty,

    #[error("unknown operator '{token}' at position {position} (expected AND, OR or XOR)")]
    UnknownOperator { position: usize, token: String },

    #[error("operator '{token}' at position {position} has no following operand")]
    DanglingOperator { position: usize, token: String },

    #[error("operator '{token}' at position {position} used where a rule name is expected")]
    OperatorAsOperand { position: usize, token: String },
}

/// Why a resolved constructor could not produce an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("no constructor accepts arguments {supplied}; available: {available}")]
    NoMatchingConstructor { supplied: String, available: String },

    #[error("{role} references are not accepted by {kind} components")]
    UnsupportedReference { role: Role, kind: &'static str },

    #[error("invalid value for '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("argument {index} is {found}, expected {expected}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Failures of the indicator/rule builders and the strategy assembler.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown {kind} component: '{key}'")]
    UnknownComponent { kind: &'static str, key: String },

    #[error("unresolved {role} reference: '{name}'")]
    UnresolvedReference { role: Role, name: String },

    #[error("failed to construct {kind} '{name}' (type '{key}'): {source}")]
    ComponentConstruction {
        kind: &'static str,
        key: String,
        name: String,
        #[source]
        source: ConstructionError,
    },

    #[error("invalid {side} expression: {reason}")]
    InvalidExpression {
        side: ExpressionSide,
        reason: ExpressionError,
    },

    #[error("failed to load bar series '{name}': {source}")]
    BarSeriesLoad {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// Registration-time configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} types '{first}' and '{second}' both map to key '{key}'")]
    DuplicateKey {
        kind: &'static str,
        key: String,
        first: &'static str,
        second: &'static str,
    },
}
