//! Variable contract checks and environment construction.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::trace;

use super::document::TemplateDocument;
use super::environment::{
    CONTEXT_MODIFIERS, RESPONSE_FORMAT_TYPE, RESPONSE_FORMATTING_INSTRUCTIONS,
    ResolvedEnvironment, SAFETY_GLOBAL_INSTRUCTIONS, Variables,
};
use super::error::{ValidationError, Violation};

/// Cross-check the declared, used and supplied variables, then build the
/// environment for one render call.
///
/// Precedence, lowest first: declared defaults, supplied values, injected keys.
/// Every violation is collected before returning.
pub fn resolve(
    doc: &TemplateDocument,
    used: &BTreeSet<String>,
    supplied: &Variables,
    context_modifiers: Option<&Variables>,
) -> Result<ResolvedEnvironment, ValidationError> {
    let violations = check_contract(doc, used, supplied);
    if !violations.is_empty() {
        return Err(ValidationError { template_id: doc.template_id.clone(), violations });
    }

    let mut values = Variables::new();
    for spec in &doc.input_variables {
        if let Some(default) = &spec.default
            && !supplied.contains_key(&spec.name)
        {
            trace!(variable = %spec.name, "applying declared default");
            values.insert(spec.name.clone(), default.clone());
        }
    }

    values.extend(supplied.iter().map(|(name, value)| (name.clone(), value.clone())));

    values.insert(
        CONTEXT_MODIFIERS.to_string(),
        Value::Object(context_modifiers.cloned().unwrap_or_default()),
    );
    values.insert(
        RESPONSE_FORMATTING_INSTRUCTIONS.to_string(),
        Value::String(doc.formatting_instructions().to_string()),
    );
    values.insert(RESPONSE_FORMAT_TYPE.to_string(), Value::String(doc.format_type().to_string()));
    values.insert(
        SAFETY_GLOBAL_INSTRUCTIONS.to_string(),
        Value::String(doc.global_instructions().to_string()),
    );

    Ok(ResolvedEnvironment::from_map(values))
}

fn check_contract(
    doc: &TemplateDocument,
    used: &BTreeSet<String>,
    supplied: &Variables,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for spec in &doc.input_variables {
        if spec.required
            && !spec.has_default()
            && used.contains(&spec.name)
            && !supplied.contains_key(&spec.name)
        {
            violations.push(Violation::MissingRequired(spec.name.clone()));
        }
    }

    for name in supplied.keys() {
        if doc.variable(name).is_none() && !used.contains(name) {
            violations.push(Violation::Unexpected(name.clone()));
        }
    }

    violations
}
