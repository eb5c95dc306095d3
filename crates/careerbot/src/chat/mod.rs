//! Conversation handling: turns, sessions, history, prompts, and the chat loop

pub mod chat_loop;
pub mod history;
pub mod prompt;
pub mod prompts;
pub mod session;
pub mod turn;

pub use chat_loop::{ChatLoop, LoopState, Outcome, TranscriptEntry};
pub use history::{HistoryStore, InMemoryHistory};
pub use prompt::{Prompt, assemble};
pub use session::{SessionId, SessionIdError};
pub use turn::{Role, Turn};
