//! Application state management.
//!
//! [`ControllerState`] is the pure run/pause/help state machine; it decides
//! what an input or timer event should do but performs no effects itself.
//! [`DashboardState`] is everything the UI reads to draw a frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::history::BufferRegistry;
use crate::metrics::Snapshot;

/// Whether the dashboard is sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Live monitoring.
    Running,
    /// Timer keeps ticking, but nothing is sampled.
    Paused,
}

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Reset,
    TogglePause,
    ToggleHelp,
}

impl Action {
    /// Map a key press to an action. Unbound keys map to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Reset),
            KeyCode::Char('p') => Some(Action::TogglePause),
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => Some(Action::ToggleHelp),
            _ => None,
        }
    }
}

/// What the controller must do after applying an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Terminate the application.
    Exit,
    /// Clear every history buffer.
    ResetHistory,
    /// State changed; the next frame should reflect it.
    Redraw,
    /// Action has no effect in the current state.
    Ignored,
}

/// What a timer tick should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Acquire a snapshot and update the histories.
    Sample,
    /// Wait for the next tick.
    Skip,
}

/// Run/pause state plus the help overlay flag.
///
/// Help is orthogonal to running/paused: it can be shown over either, and
/// while it is visible reset and pause are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub run: RunState,
    pub help_visible: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            run: RunState::Running,
            help_visible: false,
        }
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.run == RunState::Paused
    }

    pub fn on_tick(&self) -> TickOutcome {
        match self.run {
            RunState::Running => TickOutcome::Sample,
            RunState::Paused => TickOutcome::Skip,
        }
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::Quit => Transition::Exit,
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                Transition::Redraw
            }
            Action::Reset | Action::TogglePause if self.help_visible => Transition::Ignored,
            Action::Reset => Transition::ResetHistory,
            Action::TogglePause => {
                self.run = match self.run {
                    RunState::Running => RunState::Paused,
                    RunState::Paused => RunState::Running,
                };
                Transition::Redraw
            }
        }
    }
}

/// Everything the UI needs to draw a frame.
pub struct DashboardState {
    /// Latest successful snapshot; `None` until the first sample lands.
    pub snapshot: Option<Snapshot>,
    /// Sample histories, shared with whoever draws.
    pub registry: Arc<BufferRegistry>,
    pub controller: ControllerState,
    /// Message from the most recent failed collection, cleared on success.
    pub last_error: Option<String>,
    /// Spinner animation frame; advances once per sample.
    pub spinner_frame: usize,
    pub last_update: Option<DateTime<Local>>,
    pub started_at: Instant,
    /// Wall-clock time a full history buffer covers.
    pub history_span: Duration,
}

impl DashboardState {
    pub fn new(registry: Arc<BufferRegistry>, history_span: Duration) -> Self {
        Self {
            snapshot: None,
            registry,
            controller: ControllerState::new(),
            last_error: None,
            spinner_frame: 0,
            last_update: None,
            started_at: Instant::now(),
            history_span,
        }
    }

    /// How long the dashboard has been running.
    pub fn runtime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
