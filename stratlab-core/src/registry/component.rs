//! Component kinds, constructors and argument marshaling.
//!
//! A component type describes itself with a list of [`Constructor`]s: a
//! parameter shape plus a plain `fn` factory taking already-resolved
//! arguments. The registry never constructs anything by introspection; it
//! picks a constructor whose shape accepts the supplied arguments and calls
//! its factory.

use std::sync::Arc;

use crate::components::indicator::Indicator;
use crate::components::rule::Rule;
use crate::domain::{BarSeries, TradingRecordHandle};
use crate::error::ConstructionError;

use super::descriptor::{ConstructorInfo, Param, ParamEnum, ParamType};

/// A capability family whose implementations are registrable.
pub trait ComponentKind: 'static {
    /// `indicator`, `rule`, …
    const NAME: &'static str;

    /// What a factory produces.
    type Output: Clone + Send + Sync + 'static;
}

/// A concrete, registrable component type.
///
/// Returning no constructors marks the type non-constructible; the registry
/// skips it.
pub trait Component<K: ComponentKind> {
    fn constructors() -> Vec<Constructor<K>>;
}

pub type Factory<K> = fn(&ResolvedArgs) -> Result<<K as ComponentKind>::Output, ConstructionError>;

// ─── Argument values ─────────────────────────────────────────────────

/// A fully typed constructor argument.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Int(i64),
    Double(f64),
    Boolean(bool),
    Num(f64),
    Enum(String),
    Indicator(Arc<dyn Indicator>),
    Rule(Arc<dyn Rule>),
    BarSeries(Arc<BarSeries>),
    TradingRecord(TradingRecordHandle),
}

impl ArgValue {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Boolean(_) => "boolean",
            Self::Num(_) => "num",
            Self::Enum(_) => "enum",
            Self::Indicator(_) => "indicator",
            Self::Rule(_) => "rule",
            Self::BarSeries(_) => "bar-series",
            Self::TradingRecord(_) => "trading-record",
        }
    }
}

/// An argument after reference lookup, before it is matched to a parameter.
///
/// Literals and constants stay text until a parameter type says how to parse
/// them; references are already typed values.
#[derive(Debug, Clone)]
pub enum ArgInput {
    Text(String),
    Value(ArgValue),
}

impl ArgInput {
    /// Coerce to the given parameter type, or `None` if incompatible.
    fn coerce(&self, ty: &ParamType) -> Option<ArgValue> {
        match (self, ty) {
            (Self::Text(s), ParamType::Int) => s.trim().parse().ok().map(ArgValue::Int),
            (Self::Text(s), ParamType::Double) => s.trim().parse().ok().map(ArgValue::Double),
            (Self::Text(s), ParamType::Num) => s.trim().parse().ok().map(ArgValue::Num),
            (Self::Text(s), ParamType::Boolean) => s.trim().parse().ok().map(ArgValue::Boolean),
            (Self::Text(s), ParamType::Enum(spec)) => spec
                .values
                .iter()
                .any(|v| *v == s.as_str())
                .then(|| ArgValue::Enum(s.clone())),
            (Self::Value(v @ ArgValue::Indicator(_)), ParamType::Indicator)
            | (Self::Value(v @ ArgValue::Rule(_)), ParamType::Rule)
            | (Self::Value(v @ ArgValue::BarSeries(_)), ParamType::BarSeries)
            | (Self::Value(v @ ArgValue::TradingRecord(_)), ParamType::TradingRecord) => {
                Some(v.clone())
            }
            _ => None,
        }
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Value(v) => v.type_tag().to_string(),
        }
    }
}

// ─── ResolvedArgs ────────────────────────────────────────────────────

/// Arguments bound to one constructor's parameters, in order.
#[derive(Debug, Clone)]
pub struct ResolvedArgs {
    params: Vec<Param>,
    values: Vec<ArgValue>,
}

impl ResolvedArgs {
    pub fn new(params: Vec<Param>, values: Vec<ArgValue>) -> Self {
        Self { params, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, index: usize, expected: &'static str) -> Result<&ArgValue, ConstructionError> {
        self.values
            .get(index)
            .ok_or(ConstructionError::ArgumentType {
                index,
                expected,
                found: "nothing",
            })
    }

    fn mismatch(index: usize, expected: &'static str, found: &ArgValue) -> ConstructionError {
        ConstructionError::ArgumentType {
            index,
            expected,
            found: found.type_tag(),
        }
    }

    fn param_name(&self, index: usize) -> &'static str {
        self.params.get(index).map(|p| p.name).unwrap_or("?")
    }

    pub fn int(&self, index: usize) -> Result<i64, ConstructionError> {
        match self.get(index, "int")? {
            ArgValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(index, "int", other)),
        }
    }

    /// A window length: an `int` that must be at least 1.
    pub fn period(&self, index: usize) -> Result<usize, ConstructionError> {
        let value = self.int(index)?;
        if value < 1 {
            return Err(ConstructionError::InvalidArgument {
                name: self.param_name(index),
                reason: format!("must be >= 1, got {value}"),
            });
        }
        usize::try_from(value).map_err(|e| ConstructionError::InvalidArgument {
            name: self.param_name(index),
            reason: e.to_string(),
        })
    }

    pub fn double(&self, index: usize) -> Result<f64, ConstructionError> {
        match self.get(index, "double")? {
            ArgValue::Double(v) => Ok(*v),
            other => Err(Self::mismatch(index, "double", other)),
        }
    }

    pub fn boolean(&self, index: usize) -> Result<bool, ConstructionError> {
        match self.get(index, "boolean")? {
            ArgValue::Boolean(v) => Ok(*v),
            other => Err(Self::mismatch(index, "boolean", other)),
        }
    }

    pub fn num(&self, index: usize) -> Result<f64, ConstructionError> {
        match self.get(index, "num")? {
            ArgValue::Num(v) => Ok(*v),
            other => Err(Self::mismatch(index, "num", other)),
        }
    }

    pub fn enumeration<E: ParamEnum>(&self, index: usize) -> Result<E, ConstructionError> {
        match self.get(index, "enum")? {
            ArgValue::Enum(name) => {
                E::from_name(name).ok_or_else(|| ConstructionError::InvalidArgument {
                    name: self.param_name(index),
                    reason: format!("'{name}' is not a member of {}", E::TYPE_NAME),
                })
            }
            other => Err(Self::mismatch(index, "enum", other)),
        }
    }

    pub fn indicator(&self, index: usize) -> Result<Arc<dyn Indicator>, ConstructionError> {
        match self.get(index, "indicator")? {
            ArgValue::Indicator(v) => Ok(Arc::clone(v)),
            other => Err(Self::mismatch(index, "indicator", other)),
        }
    }

    pub fn rule(&self, index: usize) -> Result<Arc<dyn Rule>, ConstructionError> {
        match self.get(index, "rule")? {
            ArgValue::Rule(v) => Ok(Arc::clone(v)),
            other => Err(Self::mismatch(index, "rule", other)),
        }
    }

    pub fn bar_series(&self, index: usize) -> Result<Arc<BarSeries>, ConstructionError> {
        match self.get(index, "bar-series")? {
            ArgValue::BarSeries(v) => Ok(Arc::clone(v)),
            other => Err(Self::mismatch(index, "bar-series", other)),
        }
    }

    pub fn trading_record(&self, index: usize) -> Result<TradingRecordHandle, ConstructionError> {
        match self.get(index, "trading-record")? {
            ArgValue::TradingRecord(v) => Ok(Arc::clone(v)),
            other => Err(Self::mismatch(index, "trading-record", other)),
        }
    }
}

// ─── Constructor ─────────────────────────────────────────────────────

pub struct Constructor<K: ComponentKind> {
    params: Vec<Param>,
    factory: Factory<K>,
}

// Manual impls: derive would require `K: Clone`/`K: Debug`.
impl<K: ComponentKind> Clone for Constructor<K> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            factory: self.factory,
        }
    }
}

impl<K: ComponentKind> std::fmt::Debug for Constructor<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<K: ComponentKind> Constructor<K> {
    pub fn new(params: Vec<Param>, factory: Factory<K>) -> Self {
        Self { params, factory }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Bind `inputs` to this constructor's parameters, if every one fits.
    pub fn bind(&self, inputs: &[ArgInput]) -> Option<ResolvedArgs> {
        if inputs.len() != self.params.len() {
            return None;
        }
        let values = self
            .params
            .iter()
            .zip(inputs)
            .map(|(param, input)| input.coerce(&param.ty))
            .collect::<Option<Vec<_>>>()?;
        Some(ResolvedArgs::new(self.params.clone(), values))
    }

    pub fn construct(&self, args: &ResolvedArgs) -> Result<K::Output, ConstructionError> {
        (self.factory)(args)
    }

    pub fn describe(&self) -> ConstructorInfo {
        ConstructorInfo {
            args: self.params.iter().map(Param::describe).collect(),
        }
    }
}
