//! Per-session conversation history
//!
//! The chat loop receives its history store explicitly, so front ends and
//! tests decide where turns live. The only shipped store keeps everything in
//! memory for the lifetime of the process.

use std::collections::HashMap;

use crate::chat::session::SessionId;
use crate::chat::turn::Turn;

/// Storage for the turns exchanged with the model, keyed by session
///
/// Histories are append-only: turns are never edited or removed.
pub trait HistoryStore: Send {
    /// Turns recorded for a session, oldest first
    ///
    /// Creates an empty history for sessions seen for the first time.
    fn get(&mut self, session: &SessionId) -> Vec<Turn>;

    /// Append a turn to the end of a session's history
    fn append(&mut self, session: &SessionId, turn: Turn);
}

/// Process-lifetime history store with no eviction or size bound
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    sessions: HashMap<SessionId, Vec<Turn>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session IDs that have been accessed so far
    pub fn sessions(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    /// Number of turns recorded for a session (0 if never accessed)
    pub fn len(&self, session: &SessionId) -> usize {
        self.sessions.get(session).map_or(0, Vec::len)
    }
}

impl HistoryStore for InMemoryHistory {
    fn get(&mut self, session: &SessionId) -> Vec<Turn> {
        self.sessions.entry(session.clone()).or_default().clone()
    }

    fn append(&mut self, session: &SessionId, turn: Turn) {
        tracing::debug!(session = %session, role = %turn.role, "Appending turn to history");
        self.sessions.entry(session.clone()).or_default().push(turn);
    }
}
