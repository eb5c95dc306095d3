//! Careerbot TUI - the chat page in a terminal

pub mod app;
pub mod event;
pub mod tui;
pub mod views;

pub use app::App;
pub use tui::Tui;
