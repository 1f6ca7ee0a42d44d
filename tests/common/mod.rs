//! Shared fixtures for promptweave integration tests.

#![allow(dead_code)]

use promptweave::{TemplateCompiler, TemplateDocument, Variables};
use serde_json::Value;

/// One required variable rendered into a single user segment.
pub const HELLO_TEMPLATE: &str = r#"
template_id: hello
version: 1
input_variables:
  - name: user_name
    required: true
prompt_structure:
  - role: user
    content: "Hello, {{user_name}}!"
"#;

/// A base segment plus one segment gated on `show_extra`.
pub const CONDITIONAL_TEMPLATE: &str = r#"
template_id: conditional
version: 1
input_variables:
  - name: show_extra
    type: boolean
    required: false
    default: false
prompt_structure:
  - role: system
    content: "Base instructions."
  - role: user
    content: "Extra details."
    condition: "show_extra == true"
"#;

/// Content referencing a name that nothing declares.
pub const UNKNOWN_REFERENCE_TEMPLATE: &str = r#"
template_id: unknown_ref
version: 1
prompt_structure:
  - role: user
    content: "Value: {{unknown_var}}"
"#;

/// Exercises defaults, injected keys and context modifiers together.
pub const SUPPORT_TEMPLATE: &str = r#"
template_id: support_agent
version: 3
description: Customer support prompt.
input_variables:
  - name: customer
    required: true
  - name: tone
    required: false
    default: friendly
  - name: ticket_ids
    type: list
    required: false
    default: []
prompt_structure:
  - role: system
    content: |
      You are a {{ tone }} support agent.
      {{ safety_global_instructions }}
      Reply as {{ response_format_type }}. {{ response_formatting_instructions }}
  - role: user
    content: "Customer {{ customer }} has {{ ticket_ids | length }} open tickets."
  - role: assistant
    content: "Escalating for {{ customer }}."
    conditions: "context_modifiers.escalate and not context_modifiers.dry_run"
response_formatting:
  format_type: markdown
  instructions: Keep it short.
safety_guardrails:
  global_instructions: Never share account numbers.
"#;

pub fn vars(value: Value) -> Variables {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn load(source: &str) -> TemplateDocument {
    TemplateCompiler::new().load_str(source).expect("fixture should load")
}
