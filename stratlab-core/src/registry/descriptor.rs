//! Constructor descriptor model: the shape of a component's constructors,
//! rendered for UI-driven editors.

use serde::{Deserialize, Serialize};

use super::case::camel_to_lower_hyphen;

/// An enumeration usable as a constructor parameter.
///
/// Variants are addressed by their exact member name (e.g. `Close`).
pub trait ParamEnum: Sized + Copy + 'static {
    /// Simple type name, e.g. `PriceType`.
    const TYPE_NAME: &'static str;

    /// All members in declaration order.
    fn variants() -> &'static [Self];

    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub type_name: &'static str,
    pub values: Vec<&'static str>,
}

/// Semantic type of one constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Double,
    Boolean,
    /// The generic numeric family.
    Num,
    Indicator,
    Rule,
    BarSeries,
    TradingRecord,
    Enum(EnumSpec),
}

impl ParamType {
    pub fn enumeration<E: ParamEnum>() -> Self {
        Self::Enum(EnumSpec {
            type_name: E::TYPE_NAME,
            values: E::variants().iter().map(|v| v.name()).collect(),
        })
    }

    /// Type tag: primitive name, `num`, or the lower-hyphen capability name.
    pub fn tag(&self) -> String {
        match self {
            Self::Int => "int".into(),
            Self::Double => "double".into(),
            Self::Boolean => "boolean".into(),
            Self::Num => "num".into(),
            Self::Indicator => "indicator".into(),
            Self::Rule => "rule".into(),
            Self::BarSeries => "bar-series".into(),
            Self::TradingRecord => "trading-record".into(),
            Self::Enum(spec) => camel_to_lower_hyphen(spec.type_name),
        }
    }

    /// Legal literal values; empty unless this is an enumeration.
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Enum(spec) => spec.values.iter().map(|v| v.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

/// One formal parameter as declared by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
}

impl Param {
    pub fn new(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty }
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn double(name: &'static str) -> Self {
        Self::new(name, ParamType::Double)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ParamType::Boolean)
    }

    pub fn num(name: &'static str) -> Self {
        Self::new(name, ParamType::Num)
    }

    pub fn indicator(name: &'static str) -> Self {
        Self::new(name, ParamType::Indicator)
    }

    pub fn rule(name: &'static str) -> Self {
        Self::new(name, ParamType::Rule)
    }

    pub fn bar_series(name: &'static str) -> Self {
        Self::new(name, ParamType::BarSeries)
    }

    pub fn trading_record(name: &'static str) -> Self {
        Self::new(name, ParamType::TradingRecord)
    }

    pub fn enumeration<E: ParamEnum>(name: &'static str) -> Self {
        Self::new(name, ParamType::enumeration::<E>())
    }

    pub fn describe(&self) -> ConstructorArg {
        ConstructorArg {
            type_tag: self.ty.tag(),
            name: self.name.to_string(),
            values: self.ty.values(),
        }
    }
}

// ─── Introspection records ───────────────────────────────────────────

/// One formal parameter of a constructible component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorArg {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// One constructor signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorInfo {
    pub args: Vec<ConstructorArg>,
}

impl ConstructorInfo {
    /// `(indicator first, num threshold)`
    pub fn signature(&self) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| format!("{} {}", a.type_tag, a.name))
            .collect();
        format!("({})", args.join(", "))
    }
}

/// Introspection record for one registered component kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    pub constructors: Vec<ConstructorInfo>,
}
