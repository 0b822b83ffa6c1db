//! Horizontal usage bars.
//!
//! [`render_bar`] draws the bracketed gradient bar itself. [`UsageBar`] and
//! [`MemoryBar`] lay out a label, the bar and a readout in a fixed width.
//!
//! The colour of each filled cell depends on where that cell sits in the bar,
//! not on the overall value, so a fuller bar reads as a left-to-right
//! green-to-red gradient.

use std::borrow::Cow;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::format::{format_bytes, pad_left, pad_right};
use crate::ui::theme::{usage_color, Tier, NEON_BLUE, NEON_PURPLE};

/// Glyph for a filled bar cell.
pub const BAR_GLYPH: &str = "|";

/// Below this width labels switch to their compact form.
const COMPACT_WIDTH: usize = 50;
const LABEL_WIDTH: usize = 12;
const COMPACT_LABEL_WIDTH: usize = 5;
const PERCENT_WIDTH: usize = 7;
const MIN_BAR_WIDTH: usize = 12;

const MEMORY_INFO_WIDTH: usize = 20;
const MEMORY_PERCENT_WIDTH: usize = 8;
/// Label, info, percentage and the three separating spaces.
const MEMORY_RESERVED: usize = LABEL_WIDTH + MEMORY_INFO_WIDTH + MEMORY_PERCENT_WIDTH + 3;
const MIN_MEMORY_BAR_WIDTH: usize = 22;

/// Number of filled cells for `percentage` in a bar `fill_width` cells wide.
pub fn filled_cells(percentage: f64, fill_width: usize) -> usize {
    // Also rejects NaN.
    if !(percentage > 0.0) {
        return 0;
    }
    let cells = (fill_width as f64 * percentage / 100.0).floor() as usize;
    cells.min(fill_width)
}

/// Render `[|||||     ]` in exactly `width` columns.
///
/// One column at each end is taken by the brackets, which are drawn in
/// `base`. A `width` of zero renders nothing.
pub fn render_bar(percentage: f64, width: usize, base: Style) -> Line<'static> {
    if width == 0 {
        return Line::default();
    }
    if width <= 2 {
        return Line::from(vec![Span::styled("[", base), Span::styled("]", base)]);
    }

    let fill_width = width - 2;
    let filled = filled_cells(percentage, fill_width);

    let mut spans = vec![Span::styled("[", base)];
    let runs = (0..filled)
        .map(|cell| Tier::for_percentage(cell as f64 / fill_width as f64 * 100.0))
        .dedup_with_count();
    for (count, tier) in runs {
        spans.push(Span::styled(BAR_GLYPH.repeat(count), tier.style()));
    }
    if filled < fill_width {
        spans.push(Span::raw(" ".repeat(fill_width - filled)));
    }
    spans.push(Span::styled("]", base));

    Line::from(spans)
}

/// Short form of the dashboard's bar labels for narrow layouts.
fn compact_label(label: &str) -> Cow<'_, str> {
    if let Some(core) = label.strip_prefix("Core ") {
        return Cow::Owned(format!("{core:>2}"));
    }
    match label {
        "Total CPU" => Cow::Borrowed("Total"),
        "Moving Avg" => Cow::Borrowed("Avg"),
        other => Cow::Borrowed(other),
    }
}

/// A labelled percentage bar: `Core 3       [|||||     ]  42.0%`.
pub struct UsageBar<'a> {
    label: &'a str,
    percentage: f64,
    label_style: Style,
}

impl<'a> UsageBar<'a> {
    pub fn new(label: &'a str, percentage: f64) -> Self {
        Self {
            label,
            percentage,
            label_style: Style::default().fg(NEON_BLUE),
        }
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    /// Lay the bar out for `width` columns.
    pub fn line(&self, width: usize) -> Line<'static> {
        let (label, label_width) = if width < COMPACT_WIDTH {
            (compact_label(self.label), COMPACT_LABEL_WIDTH)
        } else {
            (Cow::Borrowed(self.label), LABEL_WIDTH)
        };
        let bar_width = width
            .saturating_sub(label_width + PERCENT_WIDTH + 2)
            .max(MIN_BAR_WIDTH);

        let color = usage_color(self.percentage);
        let readout = format!("{:5.1}%", self.percentage);

        let mut spans = vec![
            Span::styled(pad_right(&label, label_width), self.label_style),
            Span::raw(" "),
        ];
        spans.extend(render_bar(self.percentage, bar_width, Style::default().fg(color)).spans);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            pad_left(&readout, PERCENT_WIDTH),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        Line::from(spans)
    }
}

impl<'a> Widget for UsageBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }
        let line = self.line(area.width as usize);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Memory bar: `Memory:      [||||      ]      6.2 GB/15.5 GB   40.12%`.
pub struct MemoryBar {
    used: u64,
    total: u64,
    percentage: f64,
}

impl MemoryBar {
    pub fn new(used: u64, total: u64, percentage: f64) -> Self {
        Self {
            used,
            total,
            percentage,
        }
    }

    pub fn line(&self, width: usize) -> Line<'static> {
        let color = usage_color(self.percentage);
        let bar_width = width
            .saturating_sub(MEMORY_RESERVED)
            .max(MIN_MEMORY_BAR_WIDTH);
        let info = format!("{}/{}", format_bytes(self.used), format_bytes(self.total));
        let readout = format!("{:6.2}%", self.percentage);

        let mut spans = vec![
            Span::styled(pad_right("Memory:", LABEL_WIDTH), Style::default().fg(NEON_PURPLE)),
            Span::raw(" "),
        ];
        spans.extend(render_bar(self.percentage, bar_width, Style::default().fg(color)).spans);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            pad_left(&info, MEMORY_INFO_WIDTH),
            Style::default().fg(color),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            pad_left(&readout, MEMORY_PERCENT_WIDTH),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        Line::from(spans)
    }
}

impl Widget for MemoryBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }
        let line = self.line(area.width as usize);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
