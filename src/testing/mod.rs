mod fake_executor;

pub use fake_executor::FakeExecutor;

use crate::domain::{SegmentSpec, TemplateDocument, VariableSpec};

/// Greeting template exercising declared defaults, default filters, injected keys
/// and a condition on a context modifier.
pub const GREETING_TEMPLATE: &str = r#"
template_id: "test_greeting_v1"
version: 1
description: "A simple test greeting prompt."
input_variables:
  - name: "user_name"
    description: "The name of the user."
    type: "string"
    required: true
  - name: "time_of_day"
    type: "string"
    required: false
  - name: "optional_mood"
    type: "string"
    required: false
    default: "neutral"
prompt_structure:
  - role: "system"
    content: |
      You are a test assistant.
      Persona: {{ context_modifiers.persona | default('test_default_persona') }}.
      Safety: {{ safety_global_instructions }}
  - role: "user"
    content: "Hello, {{ user_name }}. Good {{ time_of_day | default('day') }}. Mood: {{ optional_mood }}."
  - role: "assistant"
    content: "How can I help you, {{ user_name }}?"
    conditions: "context_modifiers.enable_help_prompt"
response_formatting:
  format_type: "text_summary"
  instructions: "Be brief in your test response."
safety_guardrails:
  global_instructions: "This is a test, be safe."
"#;

/// Small valid document identified by `template_id`.
pub fn sample_document(template_id: &str) -> TemplateDocument {
    TemplateDocument {
        template_id: template_id.to_string(),
        version: 1,
        description: Some("sample".to_string()),
        input_variables: vec![VariableSpec {
            name: "topic".to_string(),
            required: false,
            default: Some(serde_json::json!("rust")),
            description: None,
            type_hint: Some("string".to_string()),
        }],
        prompt_structure: vec![SegmentSpec {
            role: "user".to_string(),
            content: "Tell me about {{ topic }}.".to_string(),
            condition: None,
        }],
        response_formatting: None,
        safety_guardrails: None,
    }
}
