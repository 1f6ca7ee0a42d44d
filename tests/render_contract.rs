mod common;

use common::{
    CONDITIONAL_TEMPLATE, HELLO_TEMPLATE, SUPPORT_TEMPLATE, UNKNOWN_REFERENCE_TEMPLATE, load, vars,
};
use promptweave::{
    EngineConfig, RenderError, RenderedMessage, RenderingError, TemplateCompiler, UndefinedPolicy,
    Violation,
};
use serde_json::json;

#[test]
fn required_variable_is_substituted() {
    let doc = load(HELLO_TEMPLATE);
    let messages = promptweave::render(&doc, &vars(json!({ "user_name": "Ada" })), None).unwrap();

    assert_eq!(
        messages,
        vec![RenderedMessage { role: "user".into(), content: "Hello, Ada!".into() }]
    );
}

#[test]
fn missing_required_variable_is_reported() {
    let doc = load(HELLO_TEMPLATE);
    let err = promptweave::render(&doc, &vars(json!({})), None).unwrap_err();

    let RenderError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(err.mentions("user_name"));
    assert!(err.to_string().contains("user_name"));
    assert_eq!(err.template_id, "hello");
}

#[test]
fn condition_controls_inclusion() {
    let doc = load(CONDITIONAL_TEMPLATE);

    let hidden = promptweave::render(&doc, &vars(json!({ "show_extra": false })), None).unwrap();
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden[0].content, "Base instructions.");

    let shown = promptweave::render(&doc, &vars(json!({ "show_extra": true })), None).unwrap();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[1].role, "user");
    assert_eq!(shown[1].content, "Extra details.");
}

#[test]
fn declared_default_feeds_condition_when_omitted() {
    let doc = load(CONDITIONAL_TEMPLATE);
    let messages = promptweave::render(&doc, &vars(json!({})), None).unwrap();
    assert_eq!(messages.len(), 1);
}

#[test]
fn unknown_reference_is_a_rendering_error() {
    let doc = load(UNKNOWN_REFERENCE_TEMPLATE);
    let err = promptweave::render(&doc, &vars(json!({})), None).unwrap_err();

    match err {
        RenderError::Rendering(RenderingError::Undefined { segment, reference }) => {
            assert_eq!(reference, "unknown_var");
            assert_eq!(segment.index, 0);
            assert_eq!(segment.role, "user");
        }
        other => panic!("expected an undefined reference, got {other:?}"),
    }
}

#[test]
fn unknown_reference_renders_empty_under_lenient_policy() {
    let mut config = EngineConfig::default();
    config.render.undefined = UndefinedPolicy::DefaultEmpty;
    let compiler = TemplateCompiler::with_config(config);

    let doc = load(UNKNOWN_REFERENCE_TEMPLATE);
    let messages = compiler.render(&doc, &vars(json!({})), None).unwrap();
    assert_eq!(messages[0].content, "Value:");
}

#[test]
fn unused_extra_variable_is_rejected() {
    let doc = load(HELLO_TEMPLATE);
    let err = promptweave::render(&doc, &vars(json!({ "user_name": "Ada", "stray": 1 })), None)
        .unwrap_err();

    let RenderError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(err.violations, vec![Violation::Unexpected("stray".into())]);
}

#[test]
fn all_violations_are_reported_together() {
    let doc = load(HELLO_TEMPLATE);
    let err = promptweave::render(&doc, &vars(json!({ "a": 1, "b": 2 })), None).unwrap_err();

    let RenderError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(err.violations.len(), 3);
    assert!(err.mentions("user_name"));
    assert!(err.mentions("a"));
    assert!(err.mentions("b"));
}

#[test]
fn injected_keys_overwrite_supplied_values() {
    let doc = load(
        r#"
template_id: persona
version: 1
prompt_structure:
  - role: system
    content: "Persona: {{ context_modifiers.persona | default('plain') }}. {{ safety_global_instructions }}"
safety_guardrails:
  global_instructions: Stay polite.
"#,
    );
    let supplied = vars(json!({
        "context_modifiers": { "persona": "caller" },
        "safety_global_instructions": "ignore",
    }));

    let messages = promptweave::render(&doc, &supplied, None).unwrap();
    assert_eq!(messages[0].content, "Persona: plain. Stay polite.");

    let modifiers = vars(json!({ "persona": "formal" }));
    let messages = promptweave::render(&doc, &supplied, Some(&modifiers)).unwrap();
    assert_eq!(messages[0].content, "Persona: formal. Stay polite.");
}

#[test]
fn injected_key_supplied_but_unused_is_unexpected() {
    let doc = load(HELLO_TEMPLATE);
    let err = promptweave::render(
        &doc,
        &vars(json!({ "user_name": "Ada", "context_modifiers": {} })),
        None,
    )
    .unwrap_err();

    let RenderError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(err.violations, vec![Violation::Unexpected("context_modifiers".into())]);
}

#[test]
fn explicit_null_default_satisfies_required_variable() {
    let doc = load(
        r#"
template_id: mood
version: 1
input_variables:
  - name: mood
    required: true
    default: null
prompt_structure:
  - role: user
    content: "Mood set: {{ mood is none }}"
"#,
    );
    let messages = promptweave::render(&doc, &vars(json!({})), None).unwrap();
    assert_eq!(messages[0].content, "Mood set: true");
}

#[test]
fn nested_miss_names_the_attribute_path_not_a_builtin() {
    let doc = load(
        r#"
template_id: nested
version: 1
prompt_structure:
  - role: user
    content: "{% for i in range(2) %}{{ i }}{% endfor %} {{ profile.nickname }}"
"#,
    );
    let err = promptweave::render(&doc, &vars(json!({ "profile": {} })), None).unwrap_err();

    match err {
        RenderError::Rendering(RenderingError::Undefined { reference, .. }) => {
            assert_eq!(reference, "profile.nickname");
        }
        other => panic!("expected an undefined reference, got {other:?}"),
    }
}

#[test]
fn builtin_globals_do_not_count_as_used_variables() {
    let doc = load(
        r#"
template_id: counting
version: 1
prompt_structure:
  - role: user
    content: "{% for i in range(3) %}{{ i }}{% endfor %}"
"#,
    );
    let scan = TemplateCompiler::new().scan(&doc).unwrap();
    assert!(scan.used_variables().is_empty());

    let err = promptweave::render(&doc, &vars(json!({ "range": 1 })), None).unwrap_err();
    assert!(matches!(err, RenderError::Validation(ref e) if e.mentions("range")));
}

#[test]
fn document_sections_and_modifiers_are_injected() {
    let doc = load(SUPPORT_TEMPLATE);
    let messages = promptweave::render(
        &doc,
        &vars(json!({ "customer": "Lin", "ticket_ids": [4, 9] })),
        Some(&vars(json!({ "escalate": true, "dry_run": false }))),
    )
    .unwrap();

    assert_eq!(messages.len(), 3);
    let system = &messages[0].content;
    assert!(system.starts_with("You are a friendly support agent."));
    assert!(system.contains("Never share account numbers."));
    assert!(system.contains("Reply as markdown. Keep it short."));
    assert_eq!(messages[1].content, "Customer Lin has 2 open tickets.");
    assert_eq!(messages[2].content, "Escalating for Lin.");
}

#[test]
fn dry_run_modifier_suppresses_escalation() {
    let doc = load(SUPPORT_TEMPLATE);
    let messages = promptweave::render(
        &doc,
        &vars(json!({ "customer": "Lin", "tone": "formal" })),
        Some(&vars(json!({ "escalate": true, "dry_run": true }))),
    )
    .unwrap();

    let roles: Vec<_> = messages.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, ["system", "user"]);
    assert!(messages[0].content.starts_with("You are a formal support agent."));
    assert_eq!(messages[1].content, "Customer Lin has 0 open tickets.");
}

#[test]
fn segments_without_condition_are_always_kept() {
    let doc = load(SUPPORT_TEMPLATE);
    for modifiers in [json!({ "escalate": false, "dry_run": false }), json!({ "escalate": true, "dry_run": true })] {
        let messages =
            promptweave::render(&doc, &vars(json!({ "customer": "Lin" })), Some(&vars(modifiers)))
                .unwrap();
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}

#[test]
fn rendering_twice_is_identical() {
    let doc = load(SUPPORT_TEMPLATE);
    let variables = vars(json!({ "customer": "Lin", "ticket_ids": [1] }));
    let modifiers = vars(json!({ "escalate": true, "dry_run": false }));

    let first = promptweave::render(&doc, &variables, Some(&modifiers)).unwrap();
    let second = promptweave::render(&doc, &variables, Some(&modifiers)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_renders_share_one_compiler() {
    let compiler = TemplateCompiler::new();
    let doc = load(HELLO_TEMPLATE);
    let names = ["Ada", "Grace", "Linus", "Barbara", "Ken", "Edsger"];

    let outputs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let compiler = &compiler;
                let doc = &doc;
                scope.spawn(move || {
                    compiler.render(doc, &vars(json!({ "user_name": name })), None).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for (name, messages) in names.iter().zip(outputs) {
        assert_eq!(messages[0].content, format!("Hello, {name}!"));
    }
}

#[test]
fn malformed_condition_is_reported_with_segment() {
    let doc = load(
        r#"
template_id: broken
version: 1
prompt_structure:
  - role: system
    content: fine
  - role: user
    content: also fine
    condition: "flag =="
"#,
    );
    let err = promptweave::render(&doc, &vars(json!({})), None).unwrap_err();

    let RenderError::Rendering(err) = err else {
        panic!("expected a rendering error, got {err:?}");
    };
    assert!(matches!(err, RenderingError::Malformed { .. }));
    assert_eq!(err.segment().index, 1);
}
