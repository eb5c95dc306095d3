//! The interaction loop shared by every front end
//!
//! Each submission moves the loop from `Idle` to `Processing` and back. The
//! visible transcript and the model history are kept apart: the transcript
//! shows everything the user saw, including failed questions and error
//! messages, while the history only records completed exchanges.

use tracing::{info, warn};

use crate::chat::history::HistoryStore;
use crate::chat::prompt::assemble;
use crate::chat::session::SessionId;
use crate::chat::turn::{Role, Turn};
use crate::config::ModelConfig;
use crate::error::{CareerBotError, Result};
use crate::knowledge::{self, KnowledgeTable};
use crate::model::{ApiKey, ChatModel, ModelError, resolve_api_key};

/// Where the loop is in its two-state cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for both fields
    Idle,
    /// Waiting on the model reply
    Processing,
}

/// One line of the visible transcript
#[derive(Debug, Clone)]
pub enum TranscriptEntry {
    Turn(Turn),
    Error(String),
}

/// Result of a processed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model replied
    Reply(String),
    /// The model call failed; carries the message shown to the user
    Failed(String),
}

/// Drives one session's conversation against a model
pub struct ChatLoop<H: HistoryStore> {
    model: Box<dyn ChatModel>,
    history: H,
    career_data: String,
    session: SessionId,
    transcript: Vec<TranscriptEntry>,
    state: LoopState,
}

impl<H: HistoryStore> ChatLoop<H> {
    /// Create a loop for `session`, serializing the knowledge table once
    pub fn new(
        model: Box<dyn ChatModel>,
        history: H,
        table: &KnowledgeTable,
        session: SessionId,
    ) -> Result<Self> {
        let career_data = table.to_json()?;
        info!(
            "Chat loop ready: session={}, provider={}, majors={}",
            session,
            model.name(),
            table.len()
        );

        Ok(Self {
            model,
            history,
            career_data,
            session,
            transcript: Vec::new(),
            state: LoopState::Idle,
        })
    }

    /// Start a session against the configured provider
    ///
    /// The credential is resolved first (environment, then `ask`); `build` only
    /// runs once a key is in hand. A missing credential returns
    /// [`CareerBotError::MissingCredential`] before any model exists.
    pub fn connect<A, B>(
        config: &ModelConfig,
        history: H,
        session: SessionId,
        ask: A,
        build: B,
    ) -> Result<Self>
    where
        A: FnOnce(&str) -> std::io::Result<Option<String>>,
        B: FnOnce(&ModelConfig, ApiKey) -> std::result::Result<Box<dyn ChatModel>, ModelError>,
    {
        let api_key = resolve_api_key(&config.api_key_env, ask)?;
        let model = build(config, api_key)?;
        Self::new(model, history, &knowledge::load(), session)
    }

    /// Handle one interaction
    ///
    /// Returns `None` without touching any state when either field is empty.
    /// Fields are otherwise passed through as typed, whitespace included.
    /// Otherwise the question is added to the transcript, the model is called
    /// with the session's prior turns, and the reply (or an error message) is
    /// added after it. History grows only when the model succeeds.
    pub async fn submit(&mut self, major: &str, question: &str) -> Option<Outcome> {
        if major.is_empty() || question.is_empty() {
            return None;
        }

        self.state = LoopState::Processing;
        self.transcript.push(TranscriptEntry::Turn(Turn::user(question)));

        let prior = self.history.get(&self.session);
        let prompt = assemble(major, question, &self.career_data, &prior);

        let outcome = match self.model.generate(&prompt).await {
            Ok(reply) => {
                info!(
                    "Reply received: session={}, chars={}",
                    self.session,
                    reply.len()
                );
                self.history.append(&self.session, Turn::user(question));
                self.history
                    .append(&self.session, Turn::assistant(reply.clone()));
                self.transcript
                    .push(TranscriptEntry::Turn(Turn::assistant(reply.clone())));
                Outcome::Reply(reply)
            }
            Err(e) => {
                let err = CareerBotError::from(e);
                warn!("Model call failed: session={}, error={}", self.session, err);
                let message = format!("Error generating response: {err}");
                self.transcript.push(TranscriptEntry::Error(message.clone()));
                Outcome::Failed(message)
            }
        };

        self.state = LoopState::Idle;
        Some(outcome)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Everything shown to the user so far, oldest first
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Provider name of the underlying model
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }
}

impl TranscriptEntry {
    /// Label used by front ends when rendering
    pub fn label(&self) -> &'static str {
        match self {
            TranscriptEntry::Turn(turn) => match turn.role {
                Role::User => "You",
                Role::Assistant => "Advisor",
            },
            TranscriptEntry::Error(_) => "Error",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TranscriptEntry::Turn(turn) => &turn.content,
            TranscriptEntry::Error(message) => message,
        }
    }
}
