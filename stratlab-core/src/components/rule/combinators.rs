//! Boolean combinators and the operator tokens that select them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::registry::{Component, Constructor, Param};

use super::{Rule, RuleKind};

// ─── Operators ───────────────────────────────────────────────────────

/// Binary operator between two rules in an entry/exit expression or a
/// follow-up chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleOperator {
    And,
    Or,
    Xor,
}

impl RuleOperator {
    /// Exact, uppercase token match.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "XOR" => Some(Self::Xor),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }

    pub fn combine(&self, left: Arc<dyn Rule>, right: Arc<dyn Rule>) -> Arc<dyn Rule> {
        match self {
            Self::And => Arc::new(AndRule::new(left, right)),
            Self::Or => Arc::new(OrRule::new(left, right)),
            Self::Xor => Arc::new(XorRule::new(left, right)),
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

// ─── Binary combinators ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AndRule {
    rule1: Arc<dyn Rule>,
    rule2: Arc<dyn Rule>,
}

impl AndRule {
    pub fn new(rule1: Arc<dyn Rule>, rule2: Arc<dyn Rule>) -> Self {
        Self { rule1, rule2 }
    }
}

impl Rule for AndRule {
    fn is_satisfied(&self, index: usize) -> bool {
        self.rule1.is_satisfied(index) && self.rule2.is_satisfied(index)
    }
}

impl Component<RuleKind> for AndRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::rule("rule1"), Param::rule("rule2")],
            |args| Ok(Arc::new(Self::new(args.rule(0)?, args.rule(1)?))),
        )]
    }
}

#[derive(Debug, Clone)]
pub struct OrRule {
    rule1: Arc<dyn Rule>,
    rule2: Arc<dyn Rule>,
}

impl OrRule {
    pub fn new(rule1: Arc<dyn Rule>, rule2: Arc<dyn Rule>) -> Self {
        Self { rule1, rule2 }
    }
}

impl Rule for OrRule {
    fn is_satisfied(&self, index: usize) -> bool {
        self.rule1.is_satisfied(index) || self.rule2.is_satisfied(index)
    }
}

impl Component<RuleKind> for OrRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::rule("rule1"), Param::rule("rule2")],
            |args| Ok(Arc::new(Self::new(args.rule(0)?, args.rule(1)?))),
        )]
    }
}

#[derive(Debug, Clone)]
pub struct XorRule {
    rule1: Arc<dyn Rule>,
    rule2: Arc<dyn Rule>,
}

impl XorRule {
    pub fn new(rule1: Arc<dyn Rule>, rule2: Arc<dyn Rule>) -> Self {
        Self { rule1, rule2 }
    }
}

impl Rule for XorRule {
    fn is_satisfied(&self, index: usize) -> bool {
        self.rule1.is_satisfied(index) ^ self.rule2.is_satisfied(index)
    }
}

impl Component<RuleKind> for XorRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(
            vec![Param::rule("rule1"), Param::rule("rule2")],
            |args| Ok(Arc::new(Self::new(args.rule(0)?, args.rule(1)?))),
        )]
    }
}

// ─── Unary / constant ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NotRule {
    rule: Arc<dyn Rule>,
}

impl NotRule {
    pub fn new(rule: Arc<dyn Rule>) -> Self {
        Self { rule }
    }
}

impl Rule for NotRule {
    fn is_satisfied(&self, index: usize) -> bool {
        !self.rule.is_satisfied(index)
    }
}

impl Component<RuleKind> for NotRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(vec![Param::rule("rule")], |args| {
            Ok(Arc::new(Self::new(args.rule(0)?)))
        })]
    }
}

/// Always true or always false.
#[derive(Debug, Clone, Copy)]
pub struct BooleanRule {
    satisfied: bool,
}

impl BooleanRule {
    pub const TRUE: Self = Self { satisfied: true };
    pub const FALSE: Self = Self { satisfied: false };

    pub fn new(satisfied: bool) -> Self {
        Self { satisfied }
    }
}

impl Rule for BooleanRule {
    fn is_satisfied(&self, _index: usize) -> bool {
        self.satisfied
    }
}

impl Component<RuleKind> for BooleanRule {
    fn constructors() -> Vec<Constructor<RuleKind>> {
        vec![Constructor::<RuleKind>::new(vec![Param::boolean("satisfied")], |args| {
            Ok(Arc::new(Self::new(args.boolean(0)?)))
        })]
    }
}
