//! Workflow edges: conditional transitions between tasks
//!
//! An edge without a condition always fires. With a condition the runtime
//! evaluates `input` against `expected` using `expression`: when the
//! comparison holds it follows `target`, otherwise it jumps to
//! `target_if_not`.

use crate::{InputValue, TaskId};
use serde::{Deserialize, Serialize};

/// An edge in the workflow graph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source task
    pub source: TaskId,
    /// Target task, or the terminal id `_end`
    pub target: TaskId,
    /// Guard evaluated before following `target`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Task the runtime moves to when the source task fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<TaskId>,
}

impl Edge {
    /// Create an unconditional edge
    pub fn new(source: impl Into<TaskId>, target: impl Into<TaskId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition: None,
            fallback: None,
        }
    }

    /// Create an edge into the terminal task
    pub fn to_end(source: impl Into<TaskId>) -> Self {
        Self::new(source, TaskId::terminal())
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<TaskId>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Whether this edge leads into the terminal task
    pub fn is_terminal(&self) -> bool {
        self.target.is_terminal()
    }
}

/// A comparison guarding an edge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The memory slot to compare
    pub input: InputValue,
    /// The literal the slot is compared against
    pub expected: String,
    pub expression: Expression,
    /// Where to go when the comparison fails
    pub target_if_not: TaskId,
}

/// Comparison operators available to conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// Semantic similarity, judged by the runtime
    HaveSimilar,
}

impl Expression {
    pub const ALL: [Expression; 9] = [
        Expression::Equal,
        Expression::NotEqual,
        Expression::Contains,
        Expression::NotContains,
        Expression::GreaterThan,
        Expression::LessThan,
        Expression::GreaterThanOrEqual,
        Expression::LessThanOrEqual,
        Expression::HaveSimilar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Equal => "Equal",
            Expression::NotEqual => "NotEqual",
            Expression::Contains => "Contains",
            Expression::NotContains => "NotContains",
            Expression::GreaterThan => "GreaterThan",
            Expression::LessThan => "LessThan",
            Expression::GreaterThanOrEqual => "GreaterThanOrEqual",
            Expression::LessThanOrEqual => "LessThanOrEqual",
            Expression::HaveSimilar => "HaveSimilar",
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
