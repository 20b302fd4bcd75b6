//! Scoped component cache.
//!
//! An [`EvaluationScope`] owns one [`ScopedCache`] per role (constants, bar
//! series, indicators, rules, trading records). Callers create one scope per
//! unit of work (a strategy build, a backtest run, a test) and pass it by
//! `&mut` into every builder call; scopes never share storage, so concurrent
//! builds on different threads cannot observe each other's instances.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::components::indicator::Indicator;
use crate::components::rule::Rule;
use crate::domain::{BarSeries, TradingRecordHandle};

/// Role a cached value plays in a scope. Keys are independent per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Constant,
    BarSeries,
    Indicator,
    Rule,
    TradingRecord,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Constant => "constant",
            Self::BarSeries => "bar-series",
            Self::Indicator => "indicator",
            Self::Rule => "rule",
            Self::TradingRecord => "trading-record",
        })
    }
}

// ─── ScopedCache ─────────────────────────────────────────────────────

/// Key → instance map confined to one scope.
///
/// `get` never default-constructs: a key that was never `put` is absent.
#[derive(Debug, Clone)]
pub struct ScopedCache<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for ScopedCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> ScopedCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Store `value` under `key`, returning the previous value if any.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Discard every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// ─── EvaluationScope ─────────────────────────────────────────────────

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of an evaluation scope, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    fn next() -> Self {
        Self(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// All per-scope caches, one per [`Role`].
#[derive(Debug)]
pub struct EvaluationScope {
    id: ScopeId,
    pub constants: ScopedCache<String>,
    pub bar_series: ScopedCache<Arc<BarSeries>>,
    pub indicators: ScopedCache<Arc<dyn Indicator>>,
    pub rules: ScopedCache<Arc<dyn Rule>>,
    pub trading_records: ScopedCache<TradingRecordHandle>,
}

impl Default for EvaluationScope {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationScope {
    pub fn new() -> Self {
        Self {
            id: ScopeId::next(),
            constants: ScopedCache::new(),
            bar_series: ScopedCache::new(),
            indicators: ScopedCache::new(),
            rules: ScopedCache::new(),
            trading_records: ScopedCache::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Whether `name` is present in the cache of `role`.
    pub fn contains(&self, role: Role, name: &str) -> bool {
        match role {
            Role::Constant => self.constants.contains(name),
            Role::BarSeries => self.bar_series.contains(name),
            Role::Indicator => self.indicators.contains(name),
            Role::Rule => self.rules.contains(name),
            Role::TradingRecord => self.trading_records.contains(name),
        }
    }

    /// Teardown: discard every role's entries. The scope id is kept.
    pub fn reset(&mut self) {
        self.constants.reset();
        self.bar_series.reset();
        self.indicators.reset();
        self.rules.reset();
        self.trading_records.reset();
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
            && self.bar_series.is_empty()
            && self.indicators.is_empty()
            && self.rules.is_empty()
            && self.trading_records.is_empty()
    }
}
