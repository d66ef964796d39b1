//! Form pane widget: one bordered row per field.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Height of one field row, borders included.
pub const ROW_HEIGHT: u16 = 3;

/// A single row to render in [`draw_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    /// Display label shown in the row's border.
    pub label: String,
    /// Current text value.
    pub value: String,
    /// Whether the row has keyboard focus.
    pub focused: bool,
    /// Read-only rows are dimmed and never show a cursor.
    pub read_only: bool,
}

impl FormRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            focused: false,
            read_only: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Renders form rows stacked vertically within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(rows: &[FormRow], frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();
    let areas = Layout::vertical(constraints).split(area);

    for (row, row_area) in rows.iter().zip(areas.iter()) {
        let show_cursor = row.focused && !row.read_only;

        let border_color = if show_cursor {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let text_style = if row.read_only {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let block = Block::default()
            .title(row.label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = vec![Span::styled(row.value.as_str(), text_style)];
        if show_cursor {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), *row_area);
    }
}
