//! Vertical bar graph of a history series.
//!
//! Each sample becomes one column of `│` glyphs whose height is proportional
//! to the sample's percentage. A left margin carries 0-100% scale labels and
//! the graph is closed by a bottom axis and a time caption.

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::{Tier, DIM_GRAY, NEON_BLUE, NEON_PURPLE};

/// Columns taken by a scale label plus the axis line.
pub const SCALE_WIDTH: usize = 5;
/// The plot is never narrower than this, even if it overflows `width`.
pub const MIN_PLOT_WIDTH: usize = 20;
/// Glyph for a filled graph cell.
pub const GRAPH_GLYPH: &str = "│";
/// Rows below the plot: the axis and the caption.
pub const TRAILER_ROWS: usize = 2;

const LABEL_BLANK: &str = "    ";

/// Plot columns available in `width`.
pub fn plot_width(width: usize) -> usize {
    width.saturating_sub(SCALE_WIDTH).max(MIN_PLOT_WIDTH)
}

/// Rows filled for `value` in a graph `height` rows tall.
///
/// Non-positive values get no bar; any positive value gets at least one row.
pub fn bar_height(value: f64, height: usize) -> usize {
    if !(value > 0.0) {
        return 0;
    }
    let rows = (value * height as f64 / 100.0).floor() as usize;
    rows.clamp(1, height.max(1)).min(height)
}

/// Scale label for `row` (0 is the top row). First match wins on short graphs.
fn scale_label(row: usize, height: usize) -> &'static str {
    if row == 0 {
        "100%"
    } else if row == height / 4 {
        " 75%"
    } else if row == height / 2 {
        " 50%"
    } else if row == 3 * height / 4 {
        " 25%"
    } else if row == height - 1 {
        "  0%"
    } else {
        LABEL_BLANK
    }
}

/// Render `values` as a graph `height` plot rows tall in `width` columns.
///
/// Only the newest samples that fit are shown, the newest in the rightmost
/// column. Cells are coloured by their height within their own column.
/// The result has `height` plot rows followed by the axis and caption
/// lines; it is empty when there is nothing to draw.
pub fn render_graph(values: &[f64], width: usize, height: usize, span_label: &str) -> Vec<Line<'static>> {
    if values.is_empty() || width == 0 || height == 0 {
        return Vec::new();
    }

    let plot_width = plot_width(width);
    let shown = &values[values.len().saturating_sub(plot_width)..];
    let heights: Vec<usize> = shown.iter().map(|&v| bar_height(v, height)).collect();
    let scale_style = Style::default().fg(DIM_GRAY);

    let mut lines = Vec::with_capacity(height + TRAILER_ROWS);
    for row in 0..height {
        let level = height - 1 - row;
        let mut spans = vec![
            Span::styled(scale_label(row, height), scale_style),
            Span::styled(GRAPH_GLYPH, scale_style),
        ];

        let cells = (0..plot_width)
            .map(|col| match heights.get(col) {
                Some(&h) if level < h => {
                    Some(Tier::for_percentage(level as f64 / height as f64 * 100.0))
                }
                _ => None,
            })
            .dedup_with_count();
        for (count, cell) in cells {
            spans.push(match cell {
                Some(tier) => Span::styled(GRAPH_GLYPH.repeat(count), tier.style()),
                None => Span::raw(" ".repeat(count)),
            });
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(vec![
        Span::raw(LABEL_BLANK),
        Span::styled(format!("└{}", "─".repeat(plot_width)), scale_style),
    ]));

    let pad = plot_width.saturating_sub(1 + span_label.width() + "Now┘".width());
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(SCALE_WIDTH)),
        Span::styled(format!("└{span_label}{}Now┘", " ".repeat(pad)), scale_style),
    ]));

    lines
}

/// Bordered history graph titled with the span it covers.
pub struct HistoryGraph<'a> {
    values: &'a [f64],
    span_label: String,
    title: String,
    border_style: Style,
    title_style: Style,
}

impl<'a> HistoryGraph<'a> {
    pub fn new(values: &'a [f64], span_label: impl Into<String>) -> Self {
        let span_label = span_label.into();
        Self {
            values,
            title: format!(" CPU History ({span_label}) "),
            span_label,
            border_style: Style::default().fg(NEON_BLUE),
            title_style: Style::default().fg(NEON_PURPLE),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }
}

impl<'a> Widget for HistoryGraph<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style)
            .title(Span::styled(self.title, self.title_style))
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        block.render(area, buf);

        let plot_rows = (inner.height as usize).saturating_sub(TRAILER_ROWS);
        if plot_rows == 0 {
            return;
        }
        let lines = render_graph(self.values, inner.width as usize, plot_rows, &self.span_label);
        Paragraph::new(lines).render(inner, buf);
    }
}
