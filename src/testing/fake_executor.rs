use std::sync::{Arc, Mutex};

use crate::domain::{RenderedMessage, Settings};
use crate::ports::{ExecutionError, MessageExecutor};

/// A single recorded `execute` call.
#[derive(Debug, Clone)]
pub struct ExecutedRequest {
    pub messages: Vec<RenderedMessage>,
    pub settings: Settings,
}

#[derive(Clone)]
pub struct FakeExecutor {
    pub requests: Arc<Mutex<Vec<ExecutedRequest>>>,
    pub response: Result<String, String>,
}

impl FakeExecutor {
    pub fn replying(response: impl Into<String>) -> Self {
        Self { requests: Arc::new(Mutex::new(vec![])), response: Ok(response.into()) }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self { requests: Arc::new(Mutex::new(vec![])), response: Err(reason.into()) }
    }

    pub fn get_requests(&self) -> Vec<ExecutedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl MessageExecutor for FakeExecutor {
    fn execute(
        &self,
        messages: &[RenderedMessage],
        settings: &Settings,
    ) -> Result<String, ExecutionError> {
        self.requests
            .lock()
            .unwrap()
            .push(ExecutedRequest { messages: messages.to_vec(), settings: settings.clone() });
        self.response.clone().map_err(ExecutionError::Unavailable)
    }
}
