//! Help overlay showing keyboard shortcuts, sections and colour legend.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::DashboardState;
use crate::ui::format::{format_span, pad_right};
use crate::ui::theme::{Theme, Tier};

const KEY_COLUMN: usize = 15;
/// Legend swatch plus a space takes the first five key columns.
const LEGEND_COLUMN: usize = KEY_COLUMN - 5;
const SWATCH: &str = "████";

/// Help overlay drawn over the dashboard.
pub struct HelpView;

impl HelpView {
    /// Render the help overlay.
    pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState, theme: &Theme) {
        let popup_area = Self::centered_rect(90, 90, area);

        frame.render_widget(Clear, popup_area);

        let help_block = Block::default()
            .title(Span::styled(" CPU Monitor - Help ", theme.title_style))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme.border_style);

        let help_widget = Paragraph::new(help_lines(state, theme))
            .block(help_block)
            .style(theme.normal_text)
            .alignment(Alignment::Left);

        frame.render_widget(help_widget, popup_area);
    }

    /// Rect of `percent_x` by `percent_y` of `r`, centred in it.
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_width = (u32::from(r.width) * u32::from(percent_x.min(100)) / 100) as u16;
        let popup_height = (u32::from(r.height) * u32::from(percent_y.min(100)) / 100) as u16;

        Rect {
            x: r.x + (r.width - popup_width) / 2,
            y: r.y + (r.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        }
    }
}

fn section(title: &'static str, theme: &Theme) -> [Line<'static>; 2] {
    [Line::from(Span::styled(title, theme.section_style)), Line::default()]
}

fn entry(key: &str, description: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(pad_right(key, KEY_COLUMN), theme.key_style),
        Span::styled(description, theme.normal_text),
    ])
}

/// Help text. Window and span descriptions follow the running configuration.
pub(crate) fn help_lines(state: &DashboardState, theme: &Theme) -> Vec<Line<'static>> {
    let window = state.registry.aggregate().window();
    let span = format_span(state.history_span);
    let mut lines = Vec::new();

    lines.extend(section("Keyboard Shortcuts", theme));
    for (key, description) in [
        ("h", "Toggle this help screen"),
        ("q, Ctrl+C", "Quit the application"),
        ("r", "Reset CPU history"),
        ("p", "Pause/unpause monitoring"),
    ] {
        lines.push(entry(key, description.to_string(), theme));
    }

    lines.push(Line::default());
    lines.extend(section("Display Sections", theme));
    for (name, description) in [
        ("Total CPU", "Overall system CPU usage percentage".to_string()),
        ("Moving Avg", format!("{window}-sample moving average of CPU usage")),
        (
            "Core Bars",
            "Individual CPU core usage (multi-column layout for many cores)".to_string(),
        ),
        ("CPU History", format!("{span} graph of CPU usage over time")),
        ("Memory", "System RAM usage and availability".to_string()),
        ("System Info", "Load average, process count, uptime".to_string()),
    ] {
        lines.push(entry(name, description, theme));
    }

    lines.push(Line::default());
    lines.extend(section("Color Indicators", theme));
    for tier in Tier::ALL {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(SWATCH, tier.style()),
            Span::raw(" "),
            Span::styled(pad_right(tier.range_label(), LEGEND_COLUMN), theme.key_style),
            Span::styled(tier.description(), theme.normal_text),
        ]));
    }

    lines.push(Line::default());
    lines.extend(section("Command Line Options", theme));
    for (flag, description) in [
        ("-refresh ms", "Set refresh rate in milliseconds (100-5000, default: 500)"),
        ("-history n", "Number of history points to keep (default: 120)"),
        ("-avg n", "Moving average window size (default: 10)"),
        ("-config path", "Read settings from a TOML file"),
        ("-log-file path", "Write logs to a file"),
        ("-help", "Show command line help"),
    ] {
        lines.push(entry(flag, description.to_string(), theme));
    }

    lines.push(Line::default());
    lines.push(
        Line::from(Span::styled("Press 'h' to return to monitoring", theme.help_style))
            .alignment(Alignment::Center),
    );
    lines
}
