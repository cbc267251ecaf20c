use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use crate::controller::{FormController, SubmissionStatus, SubmitError};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::fmt::amount_preview;
use crate::models::{ExpenseRecord, Field, FieldValue, ScriptResponse};
use crate::tui::{self, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE, SUCCESS_STYLE};

/// How often the event loop wakes up to check for a finished request.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const WAIT_FOR_REPLY_HINT: &str = "Waiting for the reply before closing";

/// Row order on screen, following the original web form.
const ROW_ORDER: [Field; 9] = [
    Field::PaymentMethod,
    Field::Date,
    Field::Amount,
    Field::Category,
    Field::Responsible,
    Field::Detail,
    Field::InstallmentIndex,
    Field::InstallmentTotal,
    Field::Recurring,
];

pub enum FormAction {
    Continue,
    Close,
    Submit,
}

enum FieldKind {
    Text,
    Selector {
        options: &'static [&'static str],
        selected: usize,
    },
    Toggle,
}

struct FormRow {
    field: Field,
    kind: FieldKind,
}

pub struct ExpenseForm {
    controller: FormController,
    rows: Vec<FormRow>,
    focused: usize,
    /// Local validation feedback; cleared on the next keypress.
    hint: Option<String>,
    endpoint_desc: String,
}

impl ExpenseForm {
    pub fn new(controller: FormController, endpoint_desc: impl Into<String>) -> Self {
        let record = controller.record();
        let rows = ROW_ORDER
            .iter()
            .map(|&field| {
                let kind = match field.option_set() {
                    Some(set) => FieldKind::Selector {
                        options: set.values,
                        selected: selected_index(record, field),
                    },
                    None if field == Field::Recurring => FieldKind::Toggle,
                    None => FieldKind::Text,
                };
                FormRow { field, kind }
            })
            .collect();
        Self {
            controller,
            rows,
            focused: 0,
            hint: None,
            endpoint_desc: endpoint_desc.into(),
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn focused_field(&self) -> Field {
        self.rows[self.focused].field
    }

    /// Set up the terminal, run the form until the user quits, then restore.
    pub fn run(&mut self, endpoint: Arc<dyn Endpoint>) -> Result<()> {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, endpoint);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, endpoint: Arc<dyn Endpoint>) -> Result<()> {
        // At most one request is in flight, so one slot is enough.
        let (done_tx, done_rx): (Sender<Result<ScriptResponse>>, Receiver<Result<ScriptResponse>>) =
            bounded(1);

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if let Ok(outcome) = done_rx.try_recv() {
                self.apply_outcome(outcome);
                continue;
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    if self.hold_while_submitting() {
                        continue;
                    }
                    break;
                }

                match self.handle_key(code) {
                    FormAction::Close => break,
                    FormAction::Continue => {}
                    FormAction::Submit => {
                        if let Some(payload) = self.start_submit() {
                            let endpoint = Arc::clone(&endpoint);
                            let tx = done_tx.clone();
                            thread::spawn(move || {
                                // The form may have closed; a dropped receiver is fine.
                                let _ = tx.send(endpoint.post(&payload));
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormAction {
        self.hint = None;
        let row_count = self.rows.len();

        match code {
            KeyCode::Esc if self.hold_while_submitting() => {}
            KeyCode::Esc => return FormAction::Close,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % row_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 {
                    row_count - 1
                } else {
                    self.focused - 1
                };
            }
            KeyCode::Left => self.cycle_selector(false),
            KeyCode::Right => self.cycle_selector(true),
            KeyCode::Char(' ') if matches!(self.rows[self.focused].kind, FieldKind::Toggle) => {
                let current = self.controller.record().is_recurring;
                self.set_field(Field::Recurring, FieldValue::Flag(!current));
            }
            KeyCode::Char(c) => {
                if let FieldKind::Text = self.rows[self.focused].kind {
                    let field = self.focused_field();
                    if let FieldValue::Text(mut text) = self.controller.record().get(field) {
                        text.push(c);
                        self.set_field(field, FieldValue::Text(text));
                    }
                }
            }
            KeyCode::Backspace => {
                if let FieldKind::Text = self.rows[self.focused].kind {
                    let field = self.focused_field();
                    if let FieldValue::Text(mut text) = self.controller.record().get(field) {
                        text.pop();
                        self.set_field(field, FieldValue::Text(text));
                    }
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    /// Quitting mid-request would drop the outcome of a write that may land.
    fn hold_while_submitting(&mut self) -> bool {
        if self.controller.is_submitting() {
            self.hint = Some(WAIT_FOR_REPLY_HINT.to_string());
            return true;
        }
        false
    }

    fn cycle_selector(&mut self, forward: bool) {
        let field = self.focused_field();
        let FieldKind::Selector { options, selected } = &mut self.rows[self.focused].kind else {
            return;
        };
        *selected = if forward {
            (*selected + 1) % options.len()
        } else if *selected == 0 {
            options.len() - 1
        } else {
            *selected - 1
        };
        let value = options[*selected];
        self.set_field(field, FieldValue::Text(value.to_string()));
    }

    fn set_field(&mut self, field: Field, value: FieldValue) {
        if let Err(e) = self.controller.update(field, value) {
            self.hint = Some(e.to_string());
        }
    }

    /// Move the controller into `Submitting` and return the payload, or
    /// explain why the form can't be sent yet.
    pub fn start_submit(&mut self) -> Option<ExpenseRecord> {
        match self.controller.begin_submit() {
            Ok(payload) => Some(payload),
            Err(SubmitError::InFlight) => None,
            Err(SubmitError::Invalid(errors)) => {
                if let Some(first) = errors.first() {
                    if let Some(pos) = self.rows.iter().position(|r| r.field == first.field) {
                        self.focused = pos;
                    }
                }
                self.hint = Some(SubmitError::Invalid(errors).to_string());
                None
            }
        }
    }

    pub fn apply_outcome(&mut self, outcome: Result<ScriptResponse>) {
        self.controller.finish_submit(outcome);
        let record = self.controller.record().clone();
        for row in &mut self.rows {
            if let FieldKind::Selector { selected, .. } = &mut row.kind {
                *selected = selected_index(&record, row.field);
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Expense Tracker: {}", self.endpoint_desc)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let record = self.controller.record();
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " New expense",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (i, row) in self.rows.iter().enumerate() {
            let is_focused = i == self.focused;
            let label_style = if is_focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value_style = if is_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(format!("   {:<14} ", row.field.label()), label_style)];
            match &row.kind {
                FieldKind::Text => {
                    let cursor = if is_focused { "_" } else { "" };
                    let text = match record.get(row.field) {
                        FieldValue::Text(t) => t,
                        FieldValue::Flag(_) => String::new(),
                    };
                    spans.push(Span::styled(format!("{text}{cursor}"), value_style));
                    if row.field == Field::Amount {
                        if let Some(preview) = amount_preview(&record.amount) {
                            spans.push(Span::styled(format!("  {preview}"), FOOTER_STYLE));
                        }
                    }
                }
                FieldKind::Selector { options, selected } => {
                    let arrows = if is_focused { ("< ", " >") } else { ("  ", "  ") };
                    spans.push(Span::styled(
                        format!("{}{}{}", arrows.0, options[*selected], arrows.1),
                        value_style,
                    ));
                }
                FieldKind::Toggle => {
                    let mark = if record.is_recurring { "[x]" } else { "[ ]" };
                    spans.push(Span::styled(format!("{mark} Recurring expense?"), value_style));
                }
            }
            lines.push(Line::from(spans));
        }

        let width = (content_area.width as usize).saturating_sub(4);
        let feedback = match (&self.hint, self.controller.status()) {
            (Some(hint), _) => Some((hint.as_str(), Style::default().fg(Color::Yellow))),
            (None, SubmissionStatus::Error) => Some((self.controller.message(), ERROR_STYLE)),
            (None, SubmissionStatus::Success) => Some((self.controller.message(), SUCCESS_STYLE)),
            _ => None,
        };
        if let Some((msg, style)) = feedback {
            if !msg.is_empty() {
                lines.push(Line::from(""));
                let (wrapped, _) = tui::wrap_text(msg, width);
                for part in wrapped.lines() {
                    lines.push(Line::from(Span::styled(format!("   {part}"), style)));
                }
            }
        }

        frame.render_widget(Paragraph::new(lines), content_area);

        let hints = if self.controller.is_submitting() {
            " Processing..."
        } else {
            " Tab=next field  </>=choose  Space=toggle  Enter=submit  Esc=quit"
        };
        frame.render_widget(Paragraph::new(hints).style(FOOTER_STYLE), hints_area);
    }
}

fn selected_index(record: &ExpenseRecord, field: Field) -> usize {
    match (field.option_set(), record.get(field)) {
        (Some(set), FieldValue::Text(value)) => set.position(&value).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::controller::TRANSPORT_FAILURE_MESSAGE;
    use crate::error::GastosError;

    fn make_form() -> ExpenseForm {
        let record = ExpenseRecord::new(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        ExpenseForm::new(FormController::new(record), "test")
    }

    fn focus(form: &mut ExpenseForm, field: Field) {
        while form.focused_field() != field {
            form.handle_key(KeyCode::Tab);
        }
    }

    fn type_text(form: &mut ExpenseForm, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    fn fill(form: &mut ExpenseForm) {
        focus(form, Field::Amount);
        type_text(form, "19.99");
        focus(form, Field::Detail);
        type_text(form, "Vet visit");
    }

    fn render(form: &ExpenseForm) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| form.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typing_updates_record() {
        let mut form = make_form();
        fill(&mut form);
        form.handle_key(KeyCode::Backspace);
        let record = form.controller().record();
        assert_eq!(record.amount, "19.99");
        assert_eq!(record.detail, "Vet visi");
    }

    #[test]
    fn test_typing_into_selector_is_ignored() {
        let mut form = make_form();
        assert_eq!(form.focused_field(), Field::PaymentMethod);
        type_text(&mut form, "Visa");
        assert_eq!(form.controller().record().payment_method, "Deuda Juanis");
    }

    #[test]
    fn test_selector_cycles_and_wraps() {
        let mut form = make_form();
        form.handle_key(KeyCode::Left);
        assert_eq!(form.controller().record().payment_method, "Visa");
        form.handle_key(KeyCode::Right);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.controller().record().payment_method, "Diners");

        focus(&mut form, Field::Responsible);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.controller().record().responsible, "Joha");
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = make_form();
        form.handle_key(KeyCode::BackTab);
        assert_eq!(form.focused_field(), Field::Recurring);
        form.handle_key(KeyCode::Down);
        assert_eq!(form.focused_field(), Field::PaymentMethod);
    }

    #[test]
    fn test_space_toggles_recurring() {
        let mut form = make_form();
        focus(&mut form, Field::Recurring);
        form.handle_key(KeyCode::Char(' '));
        assert!(form.controller().record().is_recurring);
        form.handle_key(KeyCode::Char(' '));
        assert!(!form.controller().record().is_recurring);
    }

    #[test]
    fn test_enter_requests_submit_and_esc_closes() {
        let mut form = make_form();
        assert!(matches!(form.handle_key(KeyCode::Enter), FormAction::Submit));
        assert!(matches!(form.handle_key(KeyCode::Esc), FormAction::Close));
    }

    #[test]
    fn test_invalid_submit_focuses_first_problem() {
        let mut form = make_form();
        focus(&mut form, Field::Amount);
        type_text(&mut form, "5");
        focus(&mut form, Field::PaymentMethod);

        assert!(form.start_submit().is_none());
        assert_eq!(form.focused_field(), Field::Detail);
        assert_eq!(form.controller().status(), SubmissionStatus::Idle);
        assert!(render(&form).contains("Detail is required"));
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let mut form = make_form();
        fill(&mut form);
        assert!(form.start_submit().is_some());
        assert!(form.start_submit().is_none());
        assert!(form.controller().is_submitting());
        assert!(render(&form).contains("Processing..."));
    }

    #[test]
    fn test_escape_while_submitting_does_not_close() {
        let mut form = make_form();
        fill(&mut form);
        form.start_submit().unwrap();
        assert!(matches!(form.handle_key(KeyCode::Esc), FormAction::Continue));
        assert!(form.controller().is_submitting());
        assert!(render(&form).contains(WAIT_FOR_REPLY_HINT));

        form.apply_outcome(Ok(ScriptResponse {
            status: Some("success".into()),
            message: None,
        }));
        assert!(matches!(form.handle_key(KeyCode::Esc), FormAction::Close));
    }

    #[test]
    fn test_success_outcome_clears_entry_fields() {
        let mut form = make_form();
        focus(&mut form, Field::Category);
        form.handle_key(KeyCode::Right);
        fill(&mut form);
        form.start_submit().unwrap();
        form.apply_outcome(Ok(ScriptResponse {
            status: Some("success".into()),
            message: Some("Row 12 added".into()),
        }));

        let record = form.controller().record();
        assert!(record.amount.is_empty());
        assert!(record.detail.is_empty());
        assert_eq!(record.category, "Comida Afuera");
        assert!(render(&form).contains("Row 12 added"));
    }

    #[test]
    fn test_transport_failure_shows_diagnostic() {
        let mut form = make_form();
        fill(&mut form);
        form.start_submit().unwrap();
        form.apply_outcome(Err(GastosError::Other("connection reset".into())));
        assert_eq!(form.controller().message(), TRANSPORT_FAILURE_MESSAGE);
        assert_eq!(form.controller().record().amount, "19.99");
        assert!(render(&form).contains("CORS"));
    }
}
