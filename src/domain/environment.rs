use serde::Serialize;
use serde_json::{Map, Value};

/// Caller-supplied variable values.
pub type Variables = Map<String, Value>;

/// Keys the engine injects into every environment.
pub const CONTEXT_MODIFIERS: &str = "context_modifiers";
pub const RESPONSE_FORMATTING_INSTRUCTIONS: &str = "response_formatting_instructions";
pub const RESPONSE_FORMAT_TYPE: &str = "response_format_type";
pub const SAFETY_GLOBAL_INSTRUCTIONS: &str = "safety_global_instructions";

/// Final name-to-value bindings for a single render call.
///
/// Immutable once built; serializes as a plain mapping so it can be handed
/// straight to the template engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedEnvironment {
    values: Variables,
}

impl ResolvedEnvironment {
    pub(crate) fn from_map(values: Variables) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
