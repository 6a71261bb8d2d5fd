//! TUI Application State
//!
//! Single owner of the wizard state machine. Every transition — key
//! handling, submission completion, reset — happens here on the event loop;
//! the renderer only reads.

use super::events::{keys, TuiEvent};
use crate::client::PredictionClient;
use crate::schema::{self, FieldKind, FieldSpec};
use crate::wizard::{Submission, Wizard};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main application state
pub struct App {
    /// The form state machine
    pub wizard: Wizard,

    /// Index of the focused field within the current step
    pub focused_field: usize,

    /// Edit buffer for the focused numeric field; mirrored into the wizard
    /// on every keystroke so the stored value tracks what is on screen
    pub numeric_buffer: String,

    /// Tick counter for the loading spinner
    pub tick_count: usize,

    /// Whether the application should quit
    pub should_quit: bool,

    client: Arc<PredictionClient>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
}

impl App {
    pub fn new(client: Arc<PredictionClient>, event_tx: mpsc::UnboundedSender<TuiEvent>) -> Self {
        let mut app = Self {
            wizard: Wizard::new(),
            focused_field: 0,
            numeric_buffer: String::new(),
            tick_count: 0,
            should_quit: false,
            client,
            event_tx,
        };
        app.sync_focus();
        app
    }

    /// Fields shown on the current step
    pub fn current_fields(&self) -> &'static [FieldSpec] {
        schema::step_fields(self.wizard.current_step())
    }

    /// The focused field's spec
    pub fn focused_spec(&self) -> &'static FieldSpec {
        let fields = self.current_fields();
        &fields[self.focused_field.min(fields.len() - 1)]
    }

    /// Display value for a field: the live edit buffer when it is the
    /// focused numeric field, the stored wire value otherwise
    pub fn display_value(&self, field: &FieldSpec) -> String {
        if field.kind == FieldKind::Numeric && field.key == self.focused_spec().key {
            self.numeric_buffer.clone()
        } else {
            self.wizard.profile().get_raw(field.key)
        }
    }

    /// Handle an incoming event
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::PredictionComplete { generation, result } => {
                self.wizard.complete(generation, result);
            }
            TuiEvent::PredictionFailed { generation } => {
                self.wizard.fail(generation);
            }
            TuiEvent::Tick => self.tick_count = self.tick_count.wrapping_add(1),
            TuiEvent::Quit => self.should_quit = true,
            TuiEvent::Resize(..) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if keys::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        match self.wizard.submission() {
            Submission::Loading => {
                // Everything except quit waits for the round trip
            }
            Submission::Succeeded(_) => {
                if keys::is_reset(&key) || keys::is_enter(&key) {
                    self.wizard.reset();
                    self.sync_focus();
                }
            }
            Submission::Idle | Submission::Failed(_) => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if keys::is_enter(&key) {
            if self.wizard.on_final_step() {
                self.submit();
            } else {
                self.wizard.advance();
                self.sync_focus();
            }
            return;
        }
        if keys::is_back(&key) {
            self.wizard.retreat();
            self.sync_focus();
            return;
        }
        if keys::is_up(&key) {
            let count = self.current_fields().len();
            self.focused_field = (self.focused_field + count - 1) % count;
            self.load_numeric_buffer();
            return;
        }
        if keys::is_down(&key) {
            let count = self.current_fields().len();
            self.focused_field = (self.focused_field + 1) % count;
            self.load_numeric_buffer();
            return;
        }

        let spec = *self.focused_spec();
        match spec.kind {
            FieldKind::Select(options) | FieldKind::Flag(options) => {
                if keys::is_right(&key) {
                    self.cycle_option(&spec, options, 1);
                } else if keys::is_left(&key) {
                    self.cycle_option(&spec, options, -1);
                }
            }
            FieldKind::Numeric => self.edit_numeric(&spec, key),
        }
    }

    /// Move the focused select field to its next/previous option
    fn cycle_option(&mut self, spec: &FieldSpec, options: &[schema::SelectOption], dir: isize) {
        let current = self.wizard.profile().get_raw(spec.key);
        let idx = options
            .iter()
            .position(|o| o.value == current)
            .unwrap_or(0) as isize;
        let count = options.len() as isize;
        let next = (idx + dir + count) % count;
        self.wizard
            .update_field(spec.key, options[next as usize].value);
    }

    /// Apply a keystroke to the numeric edit buffer and mirror it into the
    /// wizard. Invalid text coerces to NaN inside the field set — it is not
    /// rejected here.
    fn edit_numeric(&mut self, spec: &FieldSpec, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !c.is_control() => self.numeric_buffer.push(c),
            KeyCode::Backspace => {
                self.numeric_buffer.pop();
            }
            _ => return,
        }
        let raw = self.numeric_buffer.clone();
        self.wizard.update_field(spec.key, &raw);
    }

    /// Kick off the prediction request. A no-op off the final step or while
    /// a request is already in flight — the state machine enforces both.
    fn submit(&mut self) {
        let Some(ticket) = self.wizard.begin_submit() else {
            return;
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match client.predict(&ticket.profile).await {
                Ok(result) => {
                    let _ = tx.send(TuiEvent::PredictionComplete {
                        generation: ticket.generation,
                        result,
                    });
                }
                Err(e) => {
                    tracing::error!("prediction request failed: {}", e);
                    let _ = tx.send(TuiEvent::PredictionFailed {
                        generation: ticket.generation,
                    });
                }
            }
        });
    }

    /// Reset field focus after a step change and reload the numeric buffer
    fn sync_focus(&mut self) {
        self.focused_field = 0;
        self.load_numeric_buffer();
    }

    fn load_numeric_buffer(&mut self) {
        let spec = self.focused_spec();
        self.numeric_buffer = if spec.kind == FieldKind::Numeric {
            self.wizard.profile().get_raw(spec.key)
        } else {
            String::new()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TOTAL_STEPS;
    use crossterm::event::KeyModifiers;

    fn test_app() -> App {
        let client = Arc::new(PredictionClient::new("http://127.0.0.1:1").unwrap());
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(client, tx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(TuiEvent::Key(KeyEvent::new(code, KeyModifiers::empty())));
    }

    #[test]
    fn test_enter_advances_until_final_step() {
        let mut app = test_app();
        for expected in 2..=TOTAL_STEPS {
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.wizard.current_step(), expected);
        }
        assert!(app.wizard.on_final_step());
    }

    #[test]
    fn test_esc_retreats_and_clamps() {
        let mut app = test_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.wizard.current_step(), 1);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.wizard.current_step(), 1);
    }

    #[test]
    fn test_field_focus_wraps() {
        let mut app = test_app();
        let count = app.current_fields().len();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.focused_field, count - 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focused_field, 0);
    }

    #[test]
    fn test_select_cycling_updates_wizard() {
        let mut app = test_app();
        // gender is the first field on step 1, default Male
        press(&mut app, KeyCode::Right);
        assert_eq!(app.wizard.profile().gender, "Female");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.wizard.profile().gender, "Male");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.wizard.profile().gender, "Female");
    }

    #[test]
    fn test_numeric_editing_mirrors_into_wizard() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter); // step 2: tenure focused
        assert_eq!(app.numeric_buffer, "12");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('8'));
        assert_eq!(app.wizard.profile().tenure, 48.0);
    }

    #[test]
    fn test_non_numeric_input_stored_as_nan() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.wizard.profile().tenure.is_nan());
    }

    #[test]
    fn test_ctrl_c_quits_from_any_state() {
        let mut app = test_app();
        app.handle_event(TuiEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit);
    }
}
