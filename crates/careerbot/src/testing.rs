//! Test utilities for careerbot
//!
//! [`StubModel`] stands in for a remote provider so the chat loop can be
//! exercised without network access.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::chat::Prompt;
use crate::model::{ChatModel, ModelError};

enum Script {
    Always(Result<String, String>),
    Sequence(Mutex<VecDeque<Result<String, String>>>),
}

/// Deterministic [`ChatModel`] returning canned replies
///
/// `Err` entries become [`ModelError::Request`]. A scripted stub that runs
/// out of entries answers with [`ModelError::EmptyResponse`].
pub struct StubModel {
    script: Script,
    calls: CallLog,
}

/// Shared record of every prompt a [`StubModel`] received
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Prompt>>>);

impl CallLog {
    fn lock(&self) -> MutexGuard<'_, Vec<Prompt>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Copies of the received prompts, oldest first
    pub fn prompts(&self) -> Vec<Prompt> {
        self.lock().clone()
    }
}

impl StubModel {
    /// Always reply with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_script(Script::Always(Ok(text.into())))
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(Script::Always(Err(message.into())))
    }

    /// Play back `responses` in order
    pub fn scripted(responses: Vec<Result<String, String>>) -> Self {
        Self::with_script(Script::Sequence(Mutex::new(responses.into())))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: CallLog::default(),
        }
    }

    /// Handle for inspecting calls after the stub is boxed
    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }

    fn next_response(&self) -> Option<Result<String, String>> {
        match &self.script {
            Script::Always(response) => Some(response.clone()),
            Script::Sequence(queue) => queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front(),
        }
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.calls.lock().push(prompt.clone());
        match self.next_response() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ModelError::Request(message)),
            None => Err(ModelError::EmptyResponse),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
