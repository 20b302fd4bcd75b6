//! Declarative strategy configuration.
//!
//! Deserialized from JSON or TOML by [`load_strategy_config`]; the engine
//! itself only consumes the typed values.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::rule::RuleOperator;
use crate::domain::{Interval, TradeDirection};

// ─── Error type ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported config format: {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

// ─── Literal text ────────────────────────────────────────────────────

/// Literals may be written as strings, numbers or booleans; they are kept
/// as text and parsed later against the target parameter type.
#[derive(Deserialize)]
#[serde(untagged)]
enum LiteralValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl LiteralValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
        }
    }
}

fn literal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    LiteralValue::deserialize(deserializer).map(LiteralValue::into_text)
}

fn constants_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, LiteralValue>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into_text())).collect())
}

// ─── Component configs ───────────────────────────────────────────────

/// One constructor argument: a literal, or a reference by name into a
/// role of the evaluation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgConfig {
    Literal(#[serde(deserialize_with = "literal_text")] String),
    Constant(String),
    Indicator(String),
    BarSeries(String),
    Rule(String),
    TradingRecord(String),
}

impl ArgConfig {
    pub fn literal(value: impl ToString) -> Self {
        Self::Literal(value.to_string())
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::Constant(name.into())
    }

    pub fn indicator(name: impl Into<String>) -> Self {
        Self::Indicator(name.into())
    }

    pub fn bar_series(name: impl Into<String>) -> Self {
        Self::BarSeries(name.into())
    }

    pub fn rule(name: impl Into<String>) -> Self {
        Self::Rule(name.into())
    }

    pub fn trading_record(name: impl Into<String>) -> Self {
        Self::TradingRecord(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default)]
    pub args: Vec<ArgConfig>,
}

impl IndicatorConfig {
    pub fn new(name: impl Into<String>, type_key: impl Into<String>, args: Vec<ArgConfig>) -> Self {
        Self {
            name: name.into(),
            type_key: type_key.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default)]
    pub args: Vec<ArgConfig>,
    /// Rules combined, left to right, with this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<FollowUpConfig>,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>, type_key: impl Into<String>, args: Vec<ArgConfig>) -> Self {
        Self {
            name: name.into(),
            type_key: type_key.into(),
            args,
            follow_ups: Vec::new(),
        }
    }

    pub fn with_follow_up(mut self, op: RuleOperator, rule: RuleConfig) -> Self {
        self.follow_ups.push(FollowUpConfig { op, rule });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpConfig {
    pub op: RuleOperator,
    pub rule: RuleConfig,
}

/// A bar series to load before building indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeriesConfig {
    /// Name the series is cached under in the scope.
    pub name: String,
    pub instrument: String,
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

// ─── Strategy config ─────────────────────────────────────────────────

fn default_direction() -> TradeDirection {
    TradeDirection::Buy
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub strategy_name: String,
    #[serde(default = "default_direction")]
    pub direction: TradeDirection,
    #[serde(default, deserialize_with = "constants_text")]
    pub constants: BTreeMap<String, String>,
    #[serde(default)]
    pub bar_series: Vec<BarSeriesConfig>,
    /// Series the strategy trades against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_series: Option<String>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    pub entry: Vec<String>,
    pub exit: Vec<String>,
}

impl StrategyConfig {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Load a strategy config, choosing the format by file extension.
pub fn load_strategy_config(path: &Path) -> Result<StrategyConfig, ConfigError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(ext.as_deref(), Some("json") | Some("toml")) {
        return Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if ext.as_deref() == Some("json") {
        StrategyConfig::from_json(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        StrategyConfig::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
