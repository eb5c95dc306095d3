//! TUI view components

pub mod credential;
pub mod input;
pub mod transcript;

pub use credential::render_key_prompt;
pub use input::InputField;
pub use transcript::TranscriptView;
