use std::fmt;

use thiserror::Error;

use crate::domain::condition::ConditionError;
use crate::domain::config::ConfigError;
use crate::ports::{ExecutionError, StoreError};

/// Position of a segment inside `prompt_structure`, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub index: usize,
    pub role: String,
}

impl SegmentRef {
    pub fn new(index: usize, role: impl Into<String>) -> Self {
        Self { index, role: role.into() }
    }
}

impl fmt::Display for SegmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {} ({})", self.index, self.role)
    }
}

/// Structural defects in a template document.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The source text is not valid YAML/JSON.
    #[error("invalid template format: {0}")]
    Syntax(String),

    /// The document parsed but its shape is wrong. Every violation found is listed.
    #[error("template schema validation failed: {}", .0.join("; "))]
    Violations(Vec<String>),
}

impl SchemaError {
    pub fn violations(&self) -> &[String] {
        match self {
            SchemaError::Syntax(_) => &[],
            SchemaError::Violations(violations) => violations,
        }
    }
}

/// One broken clause of the variable contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Declared required, has no default, is used, and was not supplied.
    MissingRequired(String),
    /// Supplied but neither declared nor referenced.
    Unexpected(String),
}

impl Violation {
    pub fn variable(&self) -> &str {
        match self {
            Violation::MissingRequired(name) | Violation::Unexpected(name) => name,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRequired(name) => write!(f, "missing required variable: {name}"),
            Violation::Unexpected(name) => write!(f, "unexpected/unused variable: {name}"),
        }
    }
}

/// Aggregated variable-contract report for one render call.
#[derive(Debug, Clone, Error)]
#[error("input variable validation failed for '{template_id}': {}", join_violations(.violations))]
pub struct ValidationError {
    pub template_id: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// True when any violation concerns `name`.
    pub fn mentions(&self, name: &str) -> bool {
        self.violations.iter().any(|violation| violation.variable() == name)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Failure while scanning, evaluating, or substituting a segment.
#[derive(Debug, Clone, Error)]
pub enum RenderingError {
    /// Content or condition text could not be parsed.
    #[error("malformed expression in {segment}: {detail}")]
    Malformed { segment: SegmentRef, detail: String },

    /// A reference was not bound in the environment.
    #[error("undefined reference '{reference}' in {segment}")]
    Undefined { segment: SegmentRef, reference: String },

    /// The condition parsed but could not be evaluated.
    #[error("failed to evaluate condition of {segment}: {source}")]
    Condition {
        segment: SegmentRef,
        #[source]
        source: ConditionError,
    },

    /// Any other template engine failure during substitution.
    #[error("failed to render {segment}: {detail}")]
    Template { segment: SegmentRef, detail: String },
}

impl RenderingError {
    pub fn segment(&self) -> &SegmentRef {
        match self {
            RenderingError::Malformed { segment, .. }
            | RenderingError::Undefined { segment, .. }
            | RenderingError::Condition { segment, .. }
            | RenderingError::Template { segment, .. } => segment,
        }
    }
}

/// Everything `render` can fail with.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Rendering(#[from] RenderingError),
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rendering(#[from] RenderingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<RenderError> for EngineError {
    fn from(value: RenderError) -> Self {
        match value {
            RenderError::Validation(err) => EngineError::Validation(err),
            RenderError::Rendering(err) => EngineError::Rendering(err),
        }
    }
}
