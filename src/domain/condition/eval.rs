use serde_json::Value;

use super::{ConditionError, Expr};
use crate::domain::environment::ResolvedEnvironment;
use crate::domain::policy::UndefinedPolicy;

pub(super) fn evaluate(
    expr: &Expr,
    env: &ResolvedEnvironment,
    policy: UndefinedPolicy,
) -> Result<bool, ConditionError> {
    value_of(expr, env, policy).map(|value| truthy(&value))
}

fn value_of(
    expr: &Expr,
    env: &ResolvedEnvironment,
    policy: UndefinedPolicy,
) -> Result<Value, ConditionError> {
    let value = match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Path(segments) => lookup(segments, env, policy)?,
        Expr::Not(inner) => Value::Bool(!truthy(&value_of(inner, env, policy)?)),
        // Both connectives short-circuit, so the right side is never looked up
        // when the left side decides the result.
        Expr::And(lhs, rhs) => {
            Value::Bool(truthy(&value_of(lhs, env, policy)?) && truthy(&value_of(rhs, env, policy)?))
        }
        Expr::Or(lhs, rhs) => {
            Value::Bool(truthy(&value_of(lhs, env, policy)?) || truthy(&value_of(rhs, env, policy)?))
        }
        Expr::Eq(lhs, rhs) => {
            Value::Bool(values_equal(&value_of(lhs, env, policy)?, &value_of(rhs, env, policy)?))
        }
        Expr::Ne(lhs, rhs) => {
            Value::Bool(!values_equal(&value_of(lhs, env, policy)?, &value_of(rhs, env, policy)?))
        }
    };
    Ok(value)
}

fn lookup(
    segments: &[String],
    env: &ResolvedEnvironment,
    policy: UndefinedPolicy,
) -> Result<Value, ConditionError> {
    let Some((root, attrs)) = segments.split_first() else {
        return Ok(Value::Null);
    };

    let Some(mut current) = env.get(root) else {
        return match policy {
            UndefinedPolicy::Strict => Err(ConditionError::Undefined(root.clone())),
            UndefinedPolicy::DefaultEmpty => Ok(Value::Null),
        };
    };

    for (depth, attr) in attrs.iter().enumerate() {
        match current.as_object().and_then(|object| object.get(attr)) {
            Some(next) => current = next,
            None if policy.is_strict() => {
                return Err(ConditionError::MissingAttribute {
                    path: segments[..=depth].join("."),
                    attribute: attr.clone(),
                });
            }
            None => return Ok(Value::Null),
        }
    }

    Ok(current.clone())
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => lhs == rhs,
    }
}
