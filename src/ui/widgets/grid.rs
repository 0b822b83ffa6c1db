//! Multi-column layout for per-core bars.
//!
//! Cells are filled column-major: with `rows` rows, the unit at `(row, col)`
//! is `row + col * rows`, so each column shows a contiguous run of cores.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::progress::UsageBar;
use crate::ui::theme::NEON_BLUE;

/// Narrowest column before fewer columns are used.
pub const MIN_COLUMN_WIDTH: usize = 40;
/// Upper bound on columns, however wide the terminal.
pub const MAX_COLUMNS: usize = 4;

/// Column/row arrangement of `units` cells in a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub units: usize,
    pub columns: usize,
    pub rows: usize,
    pub column_width: usize,
}

impl GridLayout {
    pub fn new(units: usize, width: usize, min_column_width: usize, max_columns: usize) -> Self {
        let columns = (width / min_column_width.max(1)).clamp(1, max_columns.max(1));
        Self {
            units,
            columns,
            rows: units.div_ceil(columns),
            column_width: width / columns,
        }
    }

    /// Unit shown at `(row, col)`, or `None` for a padding cell.
    pub fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        let index = row + col * self.rows;
        (index < self.units).then_some(index)
    }

    /// Cell `(row, col)` holding unit `index`.
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.units).then(|| (index % self.rows, index / self.rows))
    }
}

/// One line per grid row of `Core N` usage bars.
///
/// Each cell is one column narrower than its share of `width` to leave room
/// for the separating space. Missing cells are blank.
pub fn render_grid(values: &[f64], width: usize, label_style: Style) -> Vec<Line<'static>> {
    let layout = GridLayout::new(values.len(), width, MIN_COLUMN_WIDTH, MAX_COLUMNS);
    let cell_width = layout.column_width.saturating_sub(1);

    (0..layout.rows)
        .map(|row| {
            let mut spans = Vec::new();
            for col in 0..layout.columns {
                if col > 0 {
                    spans.push(Span::raw(" "));
                }
                match layout.index_at(row, col) {
                    Some(index) => {
                        let label = format!("Core {index}");
                        let bar = UsageBar::new(&label, values[index]).label_style(label_style);
                        spans.extend(bar.line(cell_width).spans);
                    }
                    None => spans.push(Span::raw(" ".repeat(cell_width))),
                }
            }
            Line::from(spans)
        })
        .collect()
}

/// Grid of per-core usage bars.
pub struct CoreGrid<'a> {
    values: &'a [f64],
    label_style: Style,
}

impl<'a> CoreGrid<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self {
            values,
            label_style: Style::default().fg(NEON_BLUE),
        }
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    /// Rows needed to show every core in `width` columns.
    pub fn height(values: &[f64], width: u16) -> u16 {
        let layout = GridLayout::new(values.len(), width as usize, MIN_COLUMN_WIDTH, MAX_COLUMNS);
        u16::try_from(layout.rows).unwrap_or(u16::MAX)
    }
}

impl<'a> Widget for CoreGrid<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = render_grid(self.values, area.width as usize, self.label_style);
        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[rstest]
    #[case(0, 1)]
    #[case(39, 1)]
    #[case(80, 2)]
    #[case(120, 3)]
    #[case(160, 4)]
    #[case(400, 4)]
    fn column_count(#[case] width: usize, #[case] expected: usize) {
        assert_eq!(GridLayout::new(8, width, 40, 4).columns, expected);
    }

    #[test]
    fn ten_units_in_four_columns() {
        let layout = GridLayout::new(10, 160, 40, 4);
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.index_at(1, 2), Some(7));
        assert_eq!(layout.position_of(7), Some((1, 2)));
        // Last column holds only unit 9; the rest is padding.
        assert_eq!(layout.index_at(0, 3), Some(9));
        assert_eq!(layout.index_at(1, 3), None);
        assert_eq!(layout.index_at(2, 3), None);
    }

    #[test]
    fn no_units_no_rows() {
        let layout = GridLayout::new(0, 160, 40, 4);
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.index_at(0, 0), None);
        assert_eq!(layout.position_of(0), None);
        assert!(render_grid(&[], 160, Style::default()).is_empty());
    }

    #[test]
    fn columns_read_as_contiguous_ranges() {
        let values: Vec<f64> = (0..6).map(|i| i as f64 * 10.0).collect();
        // Two 55-column cells: wide enough for full labels.
        let lines = render_grid(&values, 110, Style::default());
        assert_eq!(lines.len(), 3);
        // Two columns of three: row r shows cores r and r + 3.
        for (row, line) in lines.iter().enumerate() {
            let rendered = text(line);
            assert!(rendered.starts_with(&format!("Core {row} ")), "{rendered}");
            assert!(rendered.contains(&format!(" Core {} ", row + 3)), "{rendered}");
        }
    }

    #[test]
    fn narrow_cells_use_compact_labels() {
        let values: Vec<f64> = (0..6).map(|i| i as f64 * 10.0).collect();
        // 80 columns gives two 39-column cells.
        let lines = render_grid(&values, 80, Style::default());
        let first = text(&lines[0]);
        assert!(first.starts_with(" 0    ["), "{first}");
        assert!(first.contains("%  3    ["), "{first}");
        assert!(!first.contains("Core"));
    }

    #[test]
    fn padding_cells_keep_alignment() {
        let values = [10.0, 20.0, 30.0];
        let lines = render_grid(&values, 80, Style::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width(), 79);
        assert_eq!(lines[1].width(), 79);
        assert!(text(&lines[1]).ends_with(&" ".repeat(39)));
    }

    #[test]
    fn widget_height_matches_rows() {
        assert_eq!(CoreGrid::height(&[0.0; 16], 160), 4);
        assert_eq!(CoreGrid::height(&[], 160), 0);
    }
}
