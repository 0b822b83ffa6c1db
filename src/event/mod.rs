//! Event handling for the dashboard.
//!
//! Terminal input and the refresh timer are merged into a single stream of
//! [`Event`]s that the application loop consumes one at a time.

pub mod handler;

pub use handler::EventHandler;

use crossterm::event::KeyEvent;

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Refresh timer fired
    Tick,
}
