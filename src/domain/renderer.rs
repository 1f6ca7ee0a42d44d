use minijinja::{Environment, ErrorKind};
use serde_json::Value;

use super::environment::ResolvedEnvironment;
use super::error::RenderingError;
use super::scanner::SegmentScan;

/// Substitute `vars` into a segment's content and trim the result.
pub fn render_segment(
    env: &Environment<'_>,
    scan: &SegmentScan,
    content: &str,
    vars: &ResolvedEnvironment,
) -> Result<String, RenderingError> {
    let rendered = env.render_str(content, vars).map_err(|err| {
        if err.kind() == ErrorKind::UndefinedError {
            let span = err.range().and_then(|range| content.get(range));
            if let Some(reference) = unbound_reference(scan, content, span, vars) {
                return RenderingError::Undefined { segment: scan.segment.clone(), reference };
            }
        }
        RenderingError::Template { segment: scan.segment.clone(), detail: err.to_string() }
    })?;

    Ok(rendered.trim().to_string())
}

/// Name the reference behind an undefined-value failure.
///
/// The engine error carries only a source span. Prefer an unbound path that
/// lies inside that span, else the first unbound path in source order.
fn unbound_reference(
    scan: &SegmentScan,
    content: &str,
    span: Option<&str>,
    vars: &ResolvedEnvironment,
) -> Option<String> {
    let mut unbound: Vec<(usize, &str, String)> = scan
        .content_paths
        .iter()
        .chain(&scan.content_variables)
        .filter_map(|path| {
            let missing = missing_prefix(path, vars)?;
            let position = content.find(path.as_str()).unwrap_or(usize::MAX);
            Some((position, path.as_str(), missing))
        })
        .collect();
    unbound.sort();

    if let Some(span) = span
        && let Some((_, _, missing)) = unbound.iter().find(|(_, path, _)| span.contains(*path))
    {
        return Some(missing.clone());
    }
    unbound.into_iter().next().map(|(_, _, missing)| missing)
}

/// The shortest prefix of a dotted `path` that `vars` does not bind.
fn missing_prefix(path: &str, vars: &ResolvedEnvironment) -> Option<String> {
    let mut segments = path.split('.');
    let root = segments.next()?;
    let Some(mut current) = vars.get(root) else {
        return Some(root.to_string());
    };

    let mut depth = root.len();
    for attr in segments {
        depth += 1 + attr.len();
        match current {
            Value::Object(object) => match object.get(attr) {
                Some(next) => current = next,
                None => return Some(path[..depth].to_string()),
            },
            _ => return Some(path[..depth].to_string()),
        }
    }
    None
}
