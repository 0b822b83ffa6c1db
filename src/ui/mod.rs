//! UI components for the CPU monitor.
//!
//! There is a single dashboard view; the help screen is an overlay on top of
//! it. Rendering is a pure function of [`DashboardState`].

mod dashboard;
pub mod format;
pub mod help;
pub mod theme;
pub mod widgets;

pub use dashboard::{DashboardView, APP_TITLE, SPINNER_FRAMES};
pub use help::HelpView;
pub use theme::Theme;

use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::DashboardState;

/// Shown until the first snapshot arrives.
pub const INITIALIZING: &str = "Initializing...";

/// Main UI controller.
///
/// Layout is taken from the frame on every draw, so a resize needs no
/// bookkeeping here.
#[derive(Default)]
pub struct Ui {
    theme: Theme,
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame.
    pub fn render(&self, frame: &mut Frame, state: &DashboardState) {
        let area = frame.size();

        match &state.snapshot {
            Some(snapshot) => DashboardView::render(frame, area, state, snapshot, &self.theme),
            None => frame.render_widget(
                Paragraph::new(INITIALIZING).style(self.theme.normal_text),
                area,
            ),
        }

        // Help is always drawn on top.
        if state.controller.help_visible {
            HelpView::render(frame, area, state, &self.theme);
        }
    }

    /// Handle terminal resize events.
    pub fn handle_resize(&self, width: u16, height: u16) {
        tracing::debug!(width, height, "terminal resized");
    }
}
