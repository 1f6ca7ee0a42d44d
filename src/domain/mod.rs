pub mod compiler;
pub mod condition;
pub mod config;
pub mod document;
pub mod environment;
pub mod error;
pub mod policy;
pub mod renderer;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod settings;
pub mod validation;

pub use compiler::{RenderedMessage, TemplateCompiler};
pub use condition::{Condition, ConditionError};
pub use config::{ConfigError, EngineConfig, RenderSettings};
pub use document::{
    ResponseFormatting, SafetyGuardrails, SegmentSpec, TemplateDocument, VariableSpec,
};
pub use environment::{ResolvedEnvironment, Variables};
pub use error::{
    EngineError, RenderError, RenderingError, SchemaError, SegmentRef, ValidationError, Violation,
};
pub use policy::UndefinedPolicy;
pub use scanner::{Scan, SegmentScan};
pub use settings::Settings;
