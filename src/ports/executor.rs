use thiserror::Error;

use crate::domain::{RenderedMessage, Settings};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Language-model backend that consumes rendered messages.
pub trait MessageExecutor {
    fn execute(
        &self,
        messages: &[RenderedMessage],
        settings: &Settings,
    ) -> Result<String, ExecutionError>;
}
