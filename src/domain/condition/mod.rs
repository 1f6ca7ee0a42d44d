//! Segment inclusion conditions.
//!
//! A deliberately small boolean language: dotted lookups, `==`/`!=`,
//! `and`/`or`/`not`, parentheses and scalar literals. Nothing else is
//! evaluable, so template authors cannot reach arbitrary code.

mod eval;
mod parser;

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use super::environment::ResolvedEnvironment;
use super::policy::UndefinedPolicy;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("'{0}' is undefined")]
    Undefined(String),

    #[error("'{path}' has no attribute '{attribute}'")]
    MissingAttribute { path: String, attribute: String },
}

impl ConditionError {
    /// The unbound reference, for undefined-name failures.
    pub fn reference(&self) -> Option<String> {
        match self {
            ConditionError::Syntax { .. } => None,
            ConditionError::Undefined(name) => Some(name.clone()),
            ConditionError::MissingAttribute { path, attribute } => {
                Some(format!("{path}.{attribute}"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Path(Vec<String>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
}

/// A parsed condition, ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    pub fn parse(source: &str) -> Result<Self, ConditionError> {
        let expr = parser::parse(source)?;
        Ok(Self { source: source.to_string(), expr })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root identifiers of every path in the expression.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_roots(&self.expr, &mut names);
        names
    }

    pub fn evaluate(
        &self,
        env: &ResolvedEnvironment,
        policy: UndefinedPolicy,
    ) -> Result<bool, ConditionError> {
        eval::evaluate(&self.expr, env, policy)
    }
}

fn collect_roots(expr: &Expr, names: &mut BTreeSet<String>) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Path(segments) => {
            if let Some(root) = segments.first() {
                names.insert(root.clone());
            }
        }
        Expr::Not(inner) => collect_roots(inner, names),
        Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) | Expr::Eq(lhs, rhs) | Expr::Ne(lhs, rhs) => {
            collect_roots(lhs, names);
            collect_roots(rhs, names);
        }
    }
}
