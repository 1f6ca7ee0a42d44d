//! Template compiler: `load` then `render`.

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EngineConfig;
use super::document::TemplateDocument;
use super::environment::Variables;
use super::error::{RenderError, RenderingError, SchemaError};
use super::renderer::render_segment;
use super::resolver::resolve;
use super::scanner::{Scan, scan_document};
use super::schema::{parse_document, validate_document};

/// One rendered message, ready for a language-model backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub role: String,
    pub content: String,
}

/// Compiles template documents into ordered message lists.
///
/// Holds no per-call state, so a single compiler can serve concurrent
/// `render` calls against shared documents.
pub struct TemplateCompiler {
    config: EngineConfig,
    env: Environment<'static>,
}

impl TemplateCompiler {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(config.render.undefined.undefined_behavior());
        env.set_trim_blocks(config.render.trim_blocks);
        env.set_lstrip_blocks(config.render.lstrip_blocks);
        env.set_keep_trailing_newline(config.render.keep_trailing_newline);
        Self { config, env }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a parsed document tree.
    pub fn load(&self, document: serde_yaml::Value) -> Result<TemplateDocument, SchemaError> {
        let doc = validate_document(document)?;
        debug!(template_id = %doc.template_id, version = doc.version, "loaded template");
        Ok(doc)
    }

    /// Parse and validate YAML or JSON source.
    pub fn load_str(&self, source: &str) -> Result<TemplateDocument, SchemaError> {
        let doc = parse_document(source)?;
        debug!(template_id = %doc.template_id, version = doc.version, "loaded template");
        Ok(doc)
    }

    /// Parse every segment and collect the free variables.
    pub fn scan(&self, doc: &TemplateDocument) -> Result<Scan, RenderingError> {
        scan_document(doc)
    }

    /// Render the included segments of `doc` in declaration order.
    ///
    /// Variable-contract violations are reported in full before any segment
    /// is evaluated. Rendering stops at the first segment that fails.
    pub fn render(
        &self,
        doc: &TemplateDocument,
        dynamic_variables: &Variables,
        context_modifiers: Option<&Variables>,
    ) -> Result<Vec<RenderedMessage>, RenderError> {
        let scan = self.scan(doc)?;
        let used = scan.used_variables();
        debug!(template_id = %doc.template_id, used = used.len(), "scanned template");

        let vars = resolve(doc, &used, dynamic_variables, context_modifiers)?;
        let policy = self.config.render.undefined;

        let mut messages = Vec::new();
        for (spec, segment_scan) in doc.prompt_structure.iter().zip(&scan.segments) {
            if let Some(condition) = &segment_scan.condition {
                let included = condition.evaluate(&vars, policy).map_err(|err| {
                    match err.reference() {
                        Some(reference) => RenderingError::Undefined {
                            segment: segment_scan.segment.clone(),
                            reference,
                        },
                        None => RenderingError::Condition {
                            segment: segment_scan.segment.clone(),
                            source: err,
                        },
                    }
                })?;
                if !included {
                    debug!(segment = segment_scan.segment.index, "condition false, skipping segment");
                    continue;
                }
            }

            let content = render_segment(&self.env, segment_scan, &spec.content, &vars)?;
            messages.push(RenderedMessage { role: spec.role.clone(), content });
        }

        debug!(template_id = %doc.template_id, messages = messages.len(), "rendered template");
        Ok(messages)
    }
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCompiler").field("config", &self.config).finish()
    }
}
