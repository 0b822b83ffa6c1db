//! Main dashboard view.
//!
//! Top to bottom the dashboard shows:
//! 1. Title bar with key hints
//! 2. System info line with the live/paused indicator
//! 3. Total and moving-average CPU bars, then one bar per core
//! 4. Bordered CPU history graph
//! 5. Memory bar
//! 6. Load, process count, uptime and runtime
//!
//! Every section has a fixed height except the core grid, which grows with
//! the number of cores and shrinks as the terminal widens.

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::metrics::Snapshot;
use crate::state::DashboardState;
use crate::ui::format::{format_duration, format_span, truncate};
use crate::ui::theme::{Theme, Tier};
use crate::ui::widgets::{CoreGrid, HistoryGraph, MemoryBar, UsageBar};

pub const APP_TITLE: &str = "CPU Monitor";

/// Braille spinner, advanced once per sample.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const PAUSED_INDICATOR: &str = "⏸ PAUSED";
const KEY_HINTS: [(&str, &str); 4] = [("h", ":help"), ("q", ":quit"), ("r", ":reset"), ("p", ":pause")];
const MODEL_NAME_WIDTH: usize = 20;
/// Eight plot rows, the axis, the caption and two border rows.
const GRAPH_HEIGHT: u16 = 12;

/// Dashboard view showing live CPU and memory metrics.
pub struct DashboardView;

impl DashboardView {
    /// Render the dashboard for `snapshot` into `area`.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        state: &DashboardState,
        snapshot: &Snapshot,
        theme: &Theme,
    ) {
        let info_height = if state.last_error.is_some() { 2 } else { 1 };
        let grid_height = CoreGrid::height(&snapshot.per_core_usage, area.width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),           // Title and separator
                Constraint::Length(info_height), // System info (and last error)
                Constraint::Length(1),
                Constraint::Length(1), // Total CPU
                Constraint::Length(1), // Moving average
                Constraint::Length(1),
                Constraint::Length(grid_height),
                Constraint::Length(GRAPH_HEIGHT),
                Constraint::Length(1), // Memory
                Constraint::Length(1),
                Constraint::Length(2), // Separator and bottom info
                Constraint::Min(0),
            ])
            .split(area);

        let width = area.width as usize;

        frame.render_widget(Paragraph::new(header_lines(width, theme)), chunks[0]);

        let mut info = vec![system_info_line(state, snapshot, theme, Local::now())];
        if let Some(err) = &state.last_error {
            info.push(Line::from(Span::styled(format!("Error: {err}"), theme.error_style)));
        }
        frame.render_widget(Paragraph::new(info), chunks[1]);

        frame.render_widget(
            UsageBar::new("Total CPU", snapshot.total_usage).label_style(theme.cpu_label_style),
            chunks[3],
        );
        frame.render_widget(
            UsageBar::new("Moving Avg", state.registry.aggregate().moving_average())
                .label_style(theme.cpu_label_style),
            chunks[4],
        );
        frame.render_widget(
            CoreGrid::new(&snapshot.per_core_usage).label_style(theme.cpu_label_style),
            chunks[6],
        );

        let history = state.registry.aggregate().values();
        frame.render_widget(
            HistoryGraph::new(&history, format_span(state.history_span))
                .border_style(theme.graph_border_style)
                .title_style(theme.graph_title_style),
            chunks[7],
        );

        frame.render_widget(
            MemoryBar::new(snapshot.memory_used, snapshot.memory_total, snapshot.memory_usage),
            chunks[8],
        );

        frame.render_widget(Paragraph::new(bottom_lines(state, snapshot, width, theme)), chunks[10]);
    }
}

/// Title with right-aligned key hints, then a double-line separator.
pub(crate) fn header_lines(width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut hints = Vec::new();
    for (i, (key, action)) in KEY_HINTS.iter().enumerate() {
        if i > 0 {
            hints.push(Span::raw("  "));
        }
        hints.push(Span::styled(*key, theme.key_style));
        hints.push(Span::styled(*action, theme.help_style));
    }
    let hints_width: usize = hints.iter().map(|s| s.content.width()).sum();
    let spacing = width
        .saturating_sub(APP_TITLE.width() + hints_width)
        .max(2);

    let mut title = vec![
        Span::styled(APP_TITLE, theme.title_style),
        Span::raw(" ".repeat(spacing)),
    ];
    title.extend(hints);

    vec![
        Line::from(title),
        Line::from(Span::styled("═".repeat(width), theme.border_style)),
    ]
}

/// Spinner (or pause marker), CPU identity, frequency, temperature and clock.
pub(crate) fn system_info_line(
    state: &DashboardState,
    snapshot: &Snapshot,
    theme: &Theme,
    now: DateTime<Local>,
) -> Line<'static> {
    let indicator = if state.controller.is_paused() {
        Span::styled(PAUSED_INDICATOR, theme.paused_style)
    } else {
        Span::styled(
            SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()],
            theme.spinner_style,
        )
    };

    let temperature = if snapshot.temperature > 0.0 {
        Span::styled(
            format!("{:.1}°C", snapshot.temperature),
            Tier::for_percentage(snapshot.temperature).style(),
        )
    } else {
        Span::raw("N/A")
    };

    Line::from(vec![
        indicator,
        Span::raw(format!(
            "  CPU: {}  Cores: {}  Threads: {}  Freq: {:.0} MHz  Temp: ",
            truncate(&snapshot.model_name, MODEL_NAME_WIDTH),
            snapshot.core_count,
            snapshot.thread_count,
            snapshot.frequency_mhz,
        )),
        temperature,
        Span::raw("  "),
        Span::styled(now.format("%H:%M:%S%.3f").to_string(), theme.time_style),
    ])
}

/// Thin separator, then load, process count, uptime and runtime.
pub(crate) fn bottom_lines(
    state: &DashboardState,
    snapshot: &Snapshot,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let load = snapshot.load_average;
    vec![
        Line::from(Span::styled("─".repeat(width), theme.scale_style)),
        Line::from(vec![
            Span::raw("Load: "),
            Span::styled(
                format!("{:.2} {:.2} {:.2}", load.one, load.five, load.fifteen),
                theme.load_style,
            ),
            Span::raw("  Processes: "),
            Span::styled(snapshot.process_count.to_string(), theme.process_style),
            Span::raw("  Uptime: "),
            Span::styled(format_duration(snapshot.uptime), theme.uptime_style),
            Span::raw("  Runtime: "),
            Span::styled(format_duration(state.runtime()), theme.uptime_style),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::history::BufferRegistry;
    use crate::metrics::LoadAverage;
    use crate::state::Action;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state() -> DashboardState {
        let n = |v| NonZeroUsize::new(v).unwrap();
        DashboardState::new(Arc::new(BufferRegistry::new(n(10), n(3))), Duration::from_secs(5))
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            model_name: "Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz".into(),
            core_count: 6,
            thread_count: 12,
            frequency_mhz: 2592.4,
            temperature: 54.3,
            process_count: 321,
            load_average: LoadAverage {
                one: 1.5,
                five: 0.75,
                fifteen: 0.1,
            },
            uptime: Duration::from_secs(2 * 3600 + 5 * 60),
            ..Snapshot::default()
        }
    }

    #[test]
    fn header_right_aligns_key_hints() {
        let lines = header_lines(60, &Theme::default());
        let title = text(&lines[0]);
        assert!(title.starts_with("CPU Monitor "));
        assert!(title.ends_with("h:help  q:quit  r:reset  p:pause"));
        assert_eq!(title.width(), 60);
        assert_eq!(text(&lines[1]), "═".repeat(60));
    }

    #[test]
    fn header_keeps_two_spaces_when_cramped() {
        let lines = header_lines(10, &Theme::default());
        assert!(text(&lines[0]).starts_with("CPU Monitor  h:help"));
    }

    #[test]
    fn system_info_shows_identity_and_clock() {
        let now = Local.with_ymd_and_hms(2024, 1, 2, 13, 4, 5).unwrap();
        let line = text(&system_info_line(&state(), &snapshot(), &Theme::default(), now));
        assert_eq!(
            line,
            "⠋  CPU: Intel(R) Core(TM)...  Cores: 6  Threads: 12  Freq: 2592 MHz  Temp: 54.3°C  13:04:05.000"
        );
    }

    #[test]
    fn unknown_temperature_and_pause_marker() {
        let mut state = state();
        state.controller.apply(Action::TogglePause);
        let snapshot = Snapshot {
            temperature: 0.0,
            ..snapshot()
        };
        let line = text(&system_info_line(&state, &snapshot, &Theme::default(), Local::now()));
        assert!(line.starts_with("⏸ PAUSED  CPU:"));
        assert!(line.contains("Temp: N/A  "));
    }

    #[test]
    fn spinner_wraps_around() {
        let mut state = state();
        state.spinner_frame = SPINNER_FRAMES.len() + 2;
        let line = text(&system_info_line(&state, &snapshot(), &Theme::default(), Local::now()));
        assert!(line.starts_with(SPINNER_FRAMES[2]));
    }

    #[test]
    fn bottom_info_formats_load_and_uptime() {
        let lines = bottom_lines(&state(), &snapshot(), 30, &Theme::default());
        assert_eq!(text(&lines[0]), "─".repeat(30));
        let info = text(&lines[1]);
        assert!(info.starts_with("Load: 1.50 0.75 0.10  Processes: 321  Uptime: 2h 5m  Runtime: 0m "));
    }
}
