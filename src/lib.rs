//! promptweave: compile declarative prompt templates into ordered chat messages.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::{FilesystemTemplateStore, MemoryTemplateStore};
pub use app::{RunOutcome, RunRequest, run_template};
pub use domain::{
    Condition, ConditionError, ConfigError, EngineConfig, EngineError, RenderError,
    RenderSettings, RenderedMessage, RenderingError, ResolvedEnvironment, SchemaError, SegmentRef,
    SegmentSpec, Settings, TemplateCompiler, TemplateDocument, UndefinedPolicy, ValidationError,
    Variables, VariableSpec, Violation,
};
pub use domain::settings::{cascade, engine_defaults};
pub use ports::{ExecutionError, MessageExecutor, StoreError, TemplateStore};

/// Validate a raw YAML document with the default compiler.
pub fn load(document: serde_yaml::Value) -> Result<TemplateDocument, SchemaError> {
    TemplateCompiler::new().load(document)
}

/// Parse and validate YAML source with the default compiler.
pub fn load_str(source: &str) -> Result<TemplateDocument, SchemaError> {
    TemplateCompiler::new().load_str(source)
}

/// Render `doc` with the default compiler.
pub fn render(
    doc: &TemplateDocument,
    variables: &Variables,
    context_modifiers: Option<&Variables>,
) -> Result<Vec<RenderedMessage>, RenderError> {
    TemplateCompiler::new().render(doc, variables, context_modifiers)
}
