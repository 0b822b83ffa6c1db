//! Custom widgets for the dashboard.
//!
//! Each widget has a pure line-building function that the tests exercise
//! directly, plus a thin [`ratatui::widgets::Widget`] impl that draws those
//! lines into a frame.

pub mod grid;
pub mod progress;
pub mod sparkline;

pub use grid::{render_grid, CoreGrid, GridLayout};
pub use progress::{render_bar, MemoryBar, UsageBar};
pub use sparkline::{render_graph, HistoryGraph};
