//! Equipment screen — form pane on the left, record list on the right.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::model::{EquipmentRecord, Field, FieldUpdate, FormState};
use crate::tui::action::Action;
use crate::tui::widgets::{FormRow, StatusBarContext, draw_form, draw_status_bar};

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    List,
}

impl Focus {
    /// Focus ring: every form field in order, then the list.
    fn ring() -> Vec<Focus> {
        Field::all()
            .iter()
            .map(|&f| Focus::Field(f))
            .chain(std::iter::once(Focus::List))
            .collect()
    }
}

/// State for the equipment screen.
#[derive(Debug, Clone)]
pub struct EquipmentScreenState {
    focus: Focus,
    /// Highlighted list row (0-based).
    selected: usize,
}

impl Default for EquipmentScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentScreenState {
    /// Starts with focus on the Name field and the cursor on the first row.
    pub fn new() -> Self {
        Self {
            focus: Focus::Field(Field::Name),
            selected: 0,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    ///
    /// Text input is written straight into `form`.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        form: &mut FormState,
        record_count: usize,
    ) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(true);
                return Action::None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => handle_form_key(key, field, form),
            Focus::List => self.handle_list_key(key, record_count),
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Returns the currently selected row index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Sets the selected row index.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
    }

    /// Keeps the cursor on an existing row after the list was replaced.
    pub fn clamp_selection(&mut self, record_count: usize) {
        self.selected = self.selected.min(record_count.saturating_sub(1));
    }

    fn cycle_focus(&mut self, forward: bool) {
        let ring = Focus::ring();
        let pos = ring.iter().position(|&f| f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % ring.len()
        } else {
            (pos + ring.len() - 1) % ring.len()
        };
        self.focus = ring[next];
    }

    fn handle_list_key(&mut self, key: KeyEvent, record_count: usize) -> Action {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                if record_count > 0 {
                    self.selected = (self.selected + 1).min(record_count - 1);
                }
                Action::None
            }
            KeyCode::Home => {
                self.selected = 0;
                Action::None
            }
            KeyCode::End => {
                self.selected = record_count.saturating_sub(1);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if self.selected < record_count {
                    self.focus = Focus::Field(Field::Name);
                    Action::Edit(self.selected)
                } else {
                    Action::None
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if self.selected < record_count {
                    Action::Delete(self.selected)
                } else {
                    Action::None
                }
            }
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }
}

fn handle_form_key(key: KeyEvent, field: Field, form: &mut FormState) -> Action {
    match key.code {
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::ClearForm,
        KeyCode::Backspace => {
            form.pop_char(field);
            Action::None
        }
        KeyCode::Char(ch) if field == Field::InStock => {
            match ch {
                ' ' => form.toggle_in_stock(),
                'y' | 'Y' => form.set_field(FieldUpdate::InStock(true)),
                'n' | 'N' => form.set_field(FieldUpdate::InStock(false)),
                _ => {}
            }
            Action::None
        }
        KeyCode::Char(ch) => {
            form.push_char(field, ch);
            Action::None
        }
        _ => Action::None,
    }
}

/// Renders the equipment screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_equipment(
    state: &EquipmentScreenState,
    form: &FormState,
    records: &[EquipmentRecord],
    in_flight: usize,
    frame: &mut Frame,
    area: Rect,
) {
    let [status_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let ctx = StatusBarContext {
        editing: form.edit_id().map(|id| id.to_string()),
        record_count: records.len(),
        in_flight,
    };
    draw_status_bar(&ctx, frame, status_area);

    let [form_area, list_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(body_area);

    draw_form_pane(state, form, frame, form_area);
    draw_list_pane(state, records, frame, list_area);

    let footer_text = match state.focus() {
        Focus::Field(Field::InStock) => "Space: toggle  Tab: next  Enter: save  Esc: clear",
        Focus::Field(_) => "Tab: next  Enter: save  Esc: clear  Ctrl+C: quit",
        Focus::List => "↑↓: navigate  e: edit  d: delete  r: refresh  Tab: form  q: quit",
    };
    let footer = Paragraph::new(footer_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[mutants::skip]
fn draw_form_pane(state: &EquipmentScreenState, form: &FormState, frame: &mut Frame, area: Rect) {
    let title = match form.edit_id() {
        Some(id) => format!(" Update Equipment #{id} "),
        None => " Add Equipment ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let id_text = form
        .edit_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(auto)".to_string());
    let mut rows = vec![FormRow::new("ID", id_text).read_only()];
    rows.extend(Field::all().iter().map(|&field| {
        FormRow::new(field.label(), form.text(field)).focused(state.focus() == Focus::Field(field))
    }));

    draw_form(&rows, frame, inner);
}

#[mutants::skip]
fn draw_list_pane(
    state: &EquipmentScreenState,
    records: &[EquipmentRecord],
    frame: &mut Frame,
    area: Rect,
) {
    let border_color = if state.focus() == Focus::List {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" Equipment ({}) ", records.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if records.is_empty() {
        let empty = Paragraph::new("No equipment yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let header = Row::new(vec![
        "ID",
        "Name",
        "Part Code",
        "Price",
        "In Stock",
        "Last Serviced",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if state.focus() == Focus::List && i == state.selected() {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                record.id.to_string(),
                record.name.clone(),
                record.part_code.clone(),
                record.price_label(),
                record.in_stock_label().to_string(),
                record.last_serviced_label(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(13),
    ];

    // Selecting the row scrolls the table so the cursor stays visible.
    let mut table_state = TableState::default().with_selected(Some(state.selected()));
    frame.render_stateful_widget(
        Table::new(rows, widths).header(header),
        inner,
        &mut table_state,
    );
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::EquipmentId;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_string(state: &mut EquipmentScreenState, form: &mut FormState, s: &str) {
        for ch in s.chars() {
            state.handle_key(press(KeyCode::Char(ch)), form, 0);
        }
    }

    fn make_record(id: u64, name: &str) -> EquipmentRecord {
        EquipmentRecord {
            id: EquipmentId::from(id),
            name: name.into(),
            part_code: format!("P-{id}"),
            price: Some(49.99),
            in_stock: true,
            last_serviced: Some("2024-01-01T10:00:00Z".into()),
        }
    }

    fn list_state(selected: usize) -> EquipmentScreenState {
        let mut state = EquipmentScreenState::new();
        state.set_focus(Focus::List);
        state.set_selected(selected);
        state
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_on_name_field() {
            let state = EquipmentScreenState::new();
            assert_eq!(state.focus(), Focus::Field(Field::Name));
            assert_eq!(state.selected(), 0);
        }

        #[test]
        fn default_trait() {
            assert_eq!(EquipmentScreenState::default().selected(), 0);
        }
    }

    mod focus {
        use super::*;

        #[test]
        fn tab_cycles_fields_then_list() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            let expected = [
                Focus::Field(Field::PartCode),
                Focus::Field(Field::Price),
                Focus::Field(Field::InStock),
                Focus::Field(Field::LastServiced),
                Focus::List,
                Focus::Field(Field::Name),
            ];
            for want in expected {
                state.handle_key(press(KeyCode::Tab), &mut form, 0);
                assert_eq!(state.focus(), want);
            }
        }

        #[test]
        fn backtab_wraps_to_list() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            state.handle_key(press(KeyCode::BackTab), &mut form, 0);
            assert_eq!(state.focus(), Focus::List);
        }
    }

    mod form_keys {
        use super::*;

        #[test]
        fn chars_fill_focused_field() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            type_string(&mut state, &mut form, "Drill");
            state.handle_key(press(KeyCode::Tab), &mut form, 0);
            type_string(&mut state, &mut form, "D-100");
            assert_eq!(form.text(Field::Name), "Drill");
            assert_eq!(form.text(Field::PartCode), "D-100");
        }

        #[test]
        fn list_shortcuts_are_plain_text_in_form() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            type_string(&mut state, &mut form, "dreq");
            assert_eq!(form.text(Field::Name), "dreq");
        }

        #[test]
        fn backspace_deletes_char() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            type_string(&mut state, &mut form, "Saw");
            state.handle_key(press(KeyCode::Backspace), &mut form, 0);
            assert_eq!(form.text(Field::Name), "Sa");
        }

        #[test]
        fn in_stock_keys() {
            let mut state = EquipmentScreenState::new();
            state.set_focus(Focus::Field(Field::InStock));
            let mut form = FormState::new();

            state.handle_key(press(KeyCode::Char(' ')), &mut form, 0);
            assert!(!form.in_stock());
            state.handle_key(press(KeyCode::Char('y')), &mut form, 0);
            assert!(form.in_stock());
            state.handle_key(press(KeyCode::Char('n')), &mut form, 0);
            assert!(!form.in_stock());
            state.handle_key(press(KeyCode::Char('x')), &mut form, 0);
            assert!(!form.in_stock());
        }

        #[test]
        fn enter_submits() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Enter), &mut form, 0),
                Action::Submit
            );
        }

        #[test]
        fn esc_clears_form() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Esc), &mut form, 0),
                Action::ClearForm
            );
        }

        #[test]
        fn unhandled_key_returns_none() {
            let mut state = EquipmentScreenState::new();
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::F(1)), &mut form, 0),
                Action::None
            );
        }
    }

    mod list_keys {
        use super::*;

        #[test]
        fn down_and_up_move_cursor() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            state.handle_key(press(KeyCode::Down), &mut form, 3);
            assert_eq!(state.selected(), 1);
            state.handle_key(press(KeyCode::Up), &mut form, 3);
            assert_eq!(state.selected(), 0);
        }

        #[test]
        fn cursor_saturates_at_ends() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            state.handle_key(press(KeyCode::Up), &mut form, 3);
            assert_eq!(state.selected(), 0);
            state.set_selected(2);
            state.handle_key(press(KeyCode::Down), &mut form, 3);
            assert_eq!(state.selected(), 2);
        }

        #[test]
        fn home_and_end_jump() {
            let mut state = list_state(1);
            let mut form = FormState::new();
            state.handle_key(press(KeyCode::End), &mut form, 5);
            assert_eq!(state.selected(), 4);
            state.handle_key(press(KeyCode::Home), &mut form, 5);
            assert_eq!(state.selected(), 0);
        }

        #[test]
        fn down_on_empty_list_stays_at_zero() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            state.handle_key(press(KeyCode::Down), &mut form, 0);
            assert_eq!(state.selected(), 0);
        }

        #[test]
        fn edit_returns_index_and_focuses_form() {
            let mut state = list_state(2);
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Char('e')), &mut form, 3),
                Action::Edit(2)
            );
            assert_eq!(state.focus(), Focus::Field(Field::Name));
        }

        #[test]
        fn enter_also_edits() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Enter), &mut form, 1),
                Action::Edit(0)
            );
        }

        #[test]
        fn edit_on_empty_list_is_none() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Enter), &mut form, 0),
                Action::None
            );
            assert_eq!(state.focus(), Focus::List);
        }

        #[test]
        fn delete_keys_return_index() {
            let mut form = FormState::new();
            let mut state = list_state(1);
            assert_eq!(
                state.handle_key(press(KeyCode::Char('d')), &mut form, 2),
                Action::Delete(1)
            );
            assert_eq!(
                state.handle_key(press(KeyCode::Delete), &mut form, 2),
                Action::Delete(1)
            );
        }

        #[test]
        fn delete_on_empty_list_is_none() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Char('d')), &mut form, 0),
                Action::None
            );
        }

        #[test]
        fn r_refreshes_and_q_quits() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            assert_eq!(
                state.handle_key(press(KeyCode::Char('r')), &mut form, 0),
                Action::Refresh
            );
            assert_eq!(
                state.handle_key(press(KeyCode::Char('q')), &mut form, 0),
                Action::Quit
            );
            assert_eq!(
                state.handle_key(press(KeyCode::Esc), &mut form, 0),
                Action::Quit
            );
        }

        #[test]
        fn list_keys_do_not_touch_form() {
            let mut state = list_state(0);
            let mut form = FormState::new();
            form.set_field(FieldUpdate::Name("Saw".into()));
            state.handle_key(press(KeyCode::Backspace), &mut form, 1);
            state.handle_key(press(KeyCode::Char('x')), &mut form, 1);
            assert_eq!(form.text(Field::Name), "Saw");
        }

        #[test]
        fn clamp_selection_after_shrink() {
            let mut state = list_state(4);
            state.clamp_selection(2);
            assert_eq!(state.selected(), 1);
            state.clamp_selection(0);
            assert_eq!(state.selected(), 0);
        }
    }

    mod rendering {
        use super::*;

        fn render(
            state: &EquipmentScreenState,
            form: &FormState,
            records: &[EquipmentRecord],
        ) -> String {
            let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
            terminal
                .draw(|frame| draw_equipment(state, form, records, 0, frame, frame.area()))
                .unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn create_mode_title() {
            let output = render(&EquipmentScreenState::new(), &FormState::new(), &[]);
            assert!(output.contains("Add Equipment"));
            assert!(output.contains("(auto)"));
            assert!(output.contains("No equipment yet"));
        }

        #[test]
        fn edit_mode_title() {
            let mut form = FormState::new();
            form.load_for_edit(&make_record(7, "Saw"));
            let output = render(&EquipmentScreenState::new(), &form, &[]);
            assert!(output.contains("Update Equipment #7"));
            assert!(output.contains("EDIT #7"));
        }

        #[test]
        fn list_shows_record_columns() {
            let records = [make_record(7, "Saw")];
            let output = render(&EquipmentScreenState::new(), &FormState::new(), &records);
            assert!(output.contains("Equipment (1)"));
            assert!(output.contains("Saw"));
            assert!(output.contains("P-7"));
            assert!(output.contains("$49.99"));
            assert!(output.contains("2024-01-01"));
            assert!(!output.contains("T10:00"));
        }

        #[test]
        fn missing_values_render_na() {
            let records = [EquipmentRecord {
                price: None,
                last_serviced: None,
                ..make_record(3, "Vise")
            }];
            let output = render(&EquipmentScreenState::new(), &FormState::new(), &records);
            assert!(output.contains("$N/A"));
            assert!(output.contains("N/A"));
        }

        #[test]
        fn list_scrolls_to_selected_record() {
            let records: Vec<EquipmentRecord> = (1..=40)
                .map(|i| make_record(i, &format!("Item {i:02}")))
                .collect();
            let output = render(&list_state(39), &FormState::new(), &records);
            assert!(output.contains("Item 40"));
            assert!(!output.contains("Item 01"));
        }

        #[test]
        fn list_starts_at_top_with_first_selected() {
            let records: Vec<EquipmentRecord> = (1..=40)
                .map(|i| make_record(i, &format!("Item {i:02}")))
                .collect();
            let output = render(&list_state(0), &FormState::new(), &records);
            assert!(output.contains("Item 01"));
            assert!(!output.contains("Item 40"));
        }
    }
}
