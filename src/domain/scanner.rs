//! Free-variable discovery across every segment of a document.

use std::collections::BTreeSet;

use minijinja::Environment;

use super::condition::Condition;
use super::document::TemplateDocument;
use super::error::{RenderingError, SegmentRef};

/// Parsed view of one segment.
#[derive(Debug, Clone)]
pub struct SegmentScan {
    pub segment: SegmentRef,
    /// Root names referenced by the content.
    pub content_variables: BTreeSet<String>,
    /// Dotted attribute paths referenced by the content (`profile.nickname`).
    pub content_paths: BTreeSet<String>,
    pub condition: Option<Condition>,
}

/// Result of scanning a whole document.
#[derive(Debug, Clone)]
pub struct Scan {
    pub segments: Vec<SegmentScan>,
}

impl Scan {
    /// Deduplicated root names referenced anywhere in the document.
    pub fn used_variables(&self) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        for segment in &self.segments {
            used.extend(segment.content_variables.iter().cloned());
            if let Some(condition) = &segment.condition {
                used.extend(condition.free_variables());
            }
        }
        used
    }
}

/// Parse every content and condition string of `doc`.
///
/// Dotted references are tracked by their root name only. Names the engine
/// provides as globals (`range`, `namespace`, ...) are not variables.
pub fn scan_document(doc: &TemplateDocument) -> Result<Scan, RenderingError> {
    // Parsing borrows the source for the environment's lifetime.
    let env = Environment::new();
    let globals: BTreeSet<&str> = env.globals().map(|(name, _)| name).collect();
    let is_variable = |path: &String| {
        let root = path.split('.').next().unwrap_or(path);
        !globals.contains(root)
    };
    let mut segments = Vec::with_capacity(doc.prompt_structure.len());

    for (index, spec) in doc.prompt_structure.iter().enumerate() {
        let segment = SegmentRef::new(index, spec.role.clone());

        let template = env.template_from_str(&spec.content).map_err(|err| {
            RenderingError::Malformed { segment: segment.clone(), detail: err.to_string() }
        })?;
        let content_variables =
            template.undeclared_variables(false).into_iter().filter(is_variable).collect();
        let content_paths =
            template.undeclared_variables(true).into_iter().filter(is_variable).collect();

        let condition = spec
            .condition_source()
            .map(Condition::parse)
            .transpose()
            .map_err(|err| RenderingError::Malformed {
                segment: segment.clone(),
                detail: format!("condition '{}': {}", spec.condition_source().unwrap_or(""), err),
            })?;

        segments.push(SegmentScan { segment, content_variables, content_paths, condition });
    }

    Ok(Scan { segments })
}
