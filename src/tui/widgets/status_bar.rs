//! Status bar widget — one-line form mode and list summary.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// Id being edited, `None` in create mode.
    pub editing: Option<String>,
    /// Number of records in the local list.
    pub record_count: usize,
    /// Requests dispatched but not yet completed.
    pub in_flight: usize,
}

/// Renders a one-line status bar.
///
/// Display format:
/// - Create mode: `ADD  3 records`
/// - Edit mode:   `EDIT #7  3 records` (EDIT in Yellow)
/// - Followed by `  syncing (2)` while requests are in flight.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let cyan = Style::default().fg(Color::Cyan);
    let yellow = Style::default().fg(Color::Yellow);

    let mut spans: Vec<Span> = Vec::new();

    match &ctx.editing {
        Some(id) => spans.push(Span::styled(format!("EDIT #{id}"), yellow)),
        None => spans.push(Span::styled("ADD", cyan)),
    }

    let noun = if ctx.record_count == 1 {
        "record"
    } else {
        "records"
    };
    spans.push(Span::styled(format!("  {} {noun}", ctx.record_count), cyan));

    if ctx.in_flight > 0 {
        spans.push(Span::styled(
            format!("  syncing ({})", ctx.in_flight),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
