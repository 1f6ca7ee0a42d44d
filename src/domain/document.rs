//! Template document model.
//!
//! A `TemplateDocument` is the validated, typed form of a YAML/JSON template.
//! Key names are the contract with template authors and are preserved on
//! re-serialization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Stable identifier chosen by the template author.
    pub template_id: String,
    /// Author-managed revision number.
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared variable contract, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_variables: Vec<VariableSpec>,
    /// Ordered message segments. Never empty after validation.
    pub prompt_structure: Vec<SegmentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_formatting: Option<ResponseFormatting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_guardrails: Option<SafetyGuardrails>,
}

impl TemplateDocument {
    /// Look up a declared variable by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.input_variables.iter().find(|spec| spec.name == name)
    }

    /// Serialize back to the YAML document format.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub(crate) fn formatting_instructions(&self) -> &str {
        self.response_formatting
            .as_ref()
            .and_then(|formatting| formatting.instructions.as_deref())
            .unwrap_or("")
    }

    pub(crate) fn format_type(&self) -> &str {
        self.response_formatting
            .as_ref()
            .and_then(|formatting| formatting.format_type.as_deref())
            .unwrap_or("text")
    }

    pub(crate) fn global_instructions(&self) -> &str {
        self.safety_guardrails
            .as_ref()
            .and_then(|guardrails| guardrails.global_instructions.as_deref())
            .unwrap_or("")
    }
}

/// One entry of `input_variables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
    /// Value used when the caller omits the variable. An explicit
    /// `default: null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Informational type hint (`string`, `list`, ...). Not enforced.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

impl VariableSpec {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// One entry of `prompt_structure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Free-form role tag (`system`, `user`, `assistant`, ...).
    pub role: String,
    /// Template text with embedded `{{ ... }}` references.
    pub content: String,
    /// Optional inclusion condition.
    #[serde(
        rename = "conditions",
        alias = "condition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,
}

impl SegmentSpec {
    /// Condition text, treating blank strings as absent.
    pub fn condition_source(&self) -> Option<&str> {
        self.condition.as_deref().filter(|source| !source.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormatting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyGuardrails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_instructions: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Only called when the key is present, so a null value still counts.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
