//! Event types for the TUI

use crossterm::event::KeyEvent;

/// Events that can occur in the TUI
#[derive(Debug)]
pub enum Event {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Nothing happened before the poll timeout
    Tick,
}
