//! Structural validation of raw template documents.
//!
//! Every check runs against the untyped YAML tree first so that all defects
//! are reported together; only a clean tree is converted into a
//! [`TemplateDocument`].

use std::collections::HashSet;

use serde_yaml::{Mapping, Value};

use super::document::TemplateDocument;
use super::error::SchemaError;

const REQUIRED_KEYS: [&str; 3] = ["template_id", "version", "prompt_structure"];

/// Parse YAML (or JSON) source and validate it.
pub fn parse_document(source: &str) -> Result<TemplateDocument, SchemaError> {
    let raw: Value =
        serde_yaml::from_str(source).map_err(|err| SchemaError::Syntax(err.to_string()))?;
    validate_document(raw)
}

/// Validate an already-parsed document tree.
pub fn validate_document(raw: Value) -> Result<TemplateDocument, SchemaError> {
    let violations = collect_violations(&raw);
    if !violations.is_empty() {
        return Err(SchemaError::Violations(violations));
    }

    serde_yaml::from_value(raw).map_err(|err| SchemaError::Violations(vec![err.to_string()]))
}

fn collect_violations(raw: &Value) -> Vec<String> {
    let mut violations = Vec::new();

    let Value::Mapping(map) = raw else {
        violations.push("template document must be a mapping".to_string());
        return violations;
    };

    for key in REQUIRED_KEYS {
        if get(map, key).is_none() {
            violations.push(format!("missing required top-level key: '{key}'"));
        }
    }

    if let Some(value) = get(map, "template_id")
        && !value.is_string()
    {
        violations.push("'template_id' must be a string".to_string());
    }

    if let Some(value) = get(map, "version")
        && value.as_i64().is_none()
    {
        violations.push("'version' must be an integer".to_string());
    }

    check_optional_string(map, "description", "'description'", &mut violations);

    if let Some(value) = get(map, "prompt_structure") {
        check_segments(value, &mut violations);
    }

    if let Some(value) = get(map, "input_variables") {
        check_variables(value, &mut violations);
    }

    let sections = [
        ("response_formatting", &["format_type", "instructions"][..]),
        ("safety_guardrails", &["global_instructions"][..]),
    ];
    for (key, fields) in sections {
        match get(map, key) {
            Some(Value::Mapping(section)) => {
                for field in fields {
                    let label = format!("'{key}.{field}'");
                    check_optional_string(section, field, &label, &mut violations);
                }
            }
            Some(Value::Null) | None => {}
            Some(_) => violations.push(format!("'{key}' must be a mapping")),
        }
    }

    violations
}

fn check_segments(value: &Value, violations: &mut Vec<String>) {
    let Value::Sequence(segments) = value else {
        violations.push("'prompt_structure' must be a list".to_string());
        return;
    };

    if segments.is_empty() {
        violations.push("'prompt_structure' must contain at least one segment".to_string());
    }

    for (index, segment) in segments.iter().enumerate() {
        let Value::Mapping(segment) = segment else {
            violations.push(format!("segment {index} in 'prompt_structure' is not a mapping"));
            continue;
        };

        for key in ["role", "content"] {
            match get(segment, key) {
                None => violations
                    .push(format!("segment {index} in 'prompt_structure' missing '{key}'")),
                Some(value) if !value.is_string() => {
                    violations.push(format!("segment {index}: '{key}' must be a string"))
                }
                Some(_) => {}
            }
        }

        for key in ["conditions", "condition"] {
            if let Some(value) = get(segment, key)
                && !value.is_string()
                && !value.is_null()
            {
                violations.push(format!("segment {index}: '{key}' must be a string"));
            }
        }
    }
}

fn check_variables(value: &Value, violations: &mut Vec<String>) {
    let Value::Sequence(specs) = value else {
        violations.push("'input_variables' must be a list of mappings".to_string());
        return;
    };

    let mut seen = HashSet::new();
    for (index, spec) in specs.iter().enumerate() {
        let name = match spec {
            Value::Mapping(spec) => get(spec, "name").map(|name| (spec, name)),
            _ => None,
        };
        let Some((spec, name)) = name else {
            violations.push(format!(
                "invalid definition for input variable at index {index}: must be a mapping with at least a 'name'"
            ));
            continue;
        };

        match name.as_str() {
            Some(name) if name.trim().is_empty() => {
                violations.push(format!("input variable at index {index} has an empty 'name'"))
            }
            Some(name) => {
                if !seen.insert(name.to_string()) {
                    violations.push(format!("duplicate input variable name: '{name}'"));
                }
            }
            None => violations.push(format!("input variable at index {index}: 'name' must be a string")),
        }

        for field in ["description", "type"] {
            let label = format!("input variable at index {index}: '{field}'");
            check_optional_string(spec, field, &label, violations);
        }

        if let Some(required) = get(spec, "required")
            && !required.is_bool()
        {
            violations.push(format!("input variable at index {index}: 'required' must be a boolean"));
        }
    }
}

/// A present, non-null `key` must hold a string.
fn check_optional_string(map: &Mapping, key: &str, label: &str, violations: &mut Vec<String>) {
    if let Some(value) = get(map, key)
        && !value.is_string()
        && !value.is_null()
    {
        violations.push(format!("{label} must be a string"));
    }
}

fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(Value::String(key.to_string()))
}
