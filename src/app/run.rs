//! Load a stored template, render it, and hand it to an executor.

use tracing::{debug, info};

use crate::domain::{
    EngineError, RenderedMessage, Settings, TemplateCompiler, Variables, settings::cascade,
};
use crate::ports::{MessageExecutor, TemplateStore};

/// Inputs for [`run_template`].
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub name: String,
    /// Stored version; the latest when `None`.
    pub version: Option<u32>,
    pub variables: Variables,
    pub context_modifiers: Option<Variables>,
    /// User-profile settings layer.
    pub profile_settings: Option<Settings>,
    /// Per-call settings layer; wins over the profile.
    pub call_settings: Option<Settings>,
}

impl RunRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_context_modifiers(mut self, modifiers: Variables) -> Self {
        self.context_modifiers = Some(modifiers);
        self
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub messages: Vec<RenderedMessage>,
    /// Settings after the cascade, exactly as sent to the executor.
    pub settings: Settings,
    pub response: String,
}

pub fn run_template<S, E>(
    compiler: &TemplateCompiler,
    store: &S,
    executor: &E,
    request: &RunRequest,
) -> Result<RunOutcome, EngineError>
where
    S: TemplateStore + ?Sized,
    E: MessageExecutor + ?Sized,
{
    let document = store.load(&request.name, request.version)?;
    debug!(name = %request.name, template_id = %document.template_id, "loaded stored template");

    let messages =
        compiler.render(&document, &request.variables, request.context_modifiers.as_ref())?;

    let settings = cascade([
        Some(&compiler.config().execution),
        request.profile_settings.as_ref(),
        request.call_settings.as_ref(),
    ]);

    let response = executor.execute(&messages, &settings)?;
    info!(name = %request.name, messages = messages.len(), "template executed");

    Ok(RunOutcome { messages, settings, response })
}
