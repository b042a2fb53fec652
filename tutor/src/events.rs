//! Event handling for the tutor TUI

use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use tutor_core::quiz::{parse_option, QuizPhase};
use tutor_core::{Difficulty, Subject};

use crate::app::{App, InputMode, Mode, PendingRequest, Screen};

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
    /// Awaited by the main loop before the next event is read.
    Request(PendingRequest),
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Run input that queued up during a request through the loading guard, so
/// keys pressed while waiting are dropped instead of replayed afterwards.
/// Ctrl+C in the queue still quits.
pub fn drain_queued_input<S>(app: &mut App, mut next_queued: S) -> io::Result<EventResult>
where
    S: FnMut() -> io::Result<Option<Event>>,
{
    let was_loading = std::mem::replace(&mut app.loading, true);
    let mut result = Ok(EventResult::Continue);

    loop {
        match next_queued() {
            Ok(Some(event)) => {
                if handle_event(app, event) == EventResult::Quit {
                    result = Ok(EventResult::Quit);
                }
            }
            Ok(None) => break,
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    app.loading = was_loading;
    result
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Nothing else is accepted while a request is in flight
    if app.loading {
        return EventResult::Continue;
    }

    if app.input_mode == InputMode::Insert {
        return handle_insert_mode(app, key);
    }

    match app.screen {
        Screen::Home => handle_home_keys(app, key),
        Screen::Study(mode) => handle_study_keys(app, mode, key),
    }
}

/// Handle keys on the subject picker
fn handle_home_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.select_prev_subject();
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.select_next_subject();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            app.select_subject(Subject::ALL[index]);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.open_subject(app.subject);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys shared by every study mode, then the mode's own keys
fn handle_study_keys(app: &mut App, mode: Mode, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Esc => {
            app.go_home();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Tab => return switch_mode(app, mode.next()),
        KeyCode::BackTab => return switch_mode(app, mode.prev()),
        _ => {}
    }

    match mode {
        Mode::Solver => handle_solver_keys(app, key),
        Mode::Theory => handle_theory_keys(app, key),
        Mode::Quiz => handle_quiz_keys(app, key),
    }
}

fn switch_mode(app: &mut App, mode: Mode) -> EventResult {
    match app.switch_mode(mode) {
        Some(request) => EventResult::Request(request),
        None => EventResult::NeedsRedraw,
    }
}

/// Handle solver keys (normal mode)
fn handle_solver_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('a') => {
            // Append mode - go to insert at end
            app.input_mode = InputMode::Insert;
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('G') => {
            app.scroll_to_bottom();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.chat_scroll = 0;
            app.scroll_locked_to_bottom = false;
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle theory keys: the topic index when open, the lesson otherwise
fn handle_theory_keys(app: &mut App, key: KeyEvent) -> EventResult {
    if key.code == KeyCode::Char('o') {
        app.toggle_topic_menu();
        return EventResult::NeedsRedraw;
    }

    if app.topic_menu_open {
        return match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.topic_cursor_down();
                EventResult::NeedsRedraw
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.topic_cursor_up();
                EventResult::NeedsRedraw
            }
            KeyCode::Char('r') if app.topics.is_empty() => {
                EventResult::Request(PendingRequest::Topics)
            }
            KeyCode::Enter => match app.selected_topic() {
                Some(topic) => EventResult::Request(PendingRequest::Lesson(topic.to_string())),
                None => EventResult::Continue,
            },
            _ => EventResult::Continue,
        };
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.lesson_scroll = 0;
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle quiz keys for the current phase
fn handle_quiz_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match app.quiz.phase() {
        QuizPhase::Menu => match key.code {
            KeyCode::Char(c @ '1'..='3') => {
                let difficulty = Difficulty::ALL[c as usize - '1' as usize];
                EventResult::Request(PendingRequest::Quiz(difficulty))
            }
            KeyCode::Enter => EventResult::Request(PendingRequest::Quiz(app.quiz_difficulty)),
            _ => EventResult::Continue,
        },
        QuizPhase::Playing => {
            if app.quiz.selected().is_some() {
                return match key.code {
                    KeyCode::Enter | KeyCode::Char('n') => {
                        app.advance_quiz();
                        EventResult::NeedsRedraw
                    }
                    _ => EventResult::Continue,
                };
            }
            match key.code {
                KeyCode::Char(c) => match parse_option(&c.to_string()) {
                    Some(option) => {
                        app.answer_quiz(option);
                        EventResult::NeedsRedraw
                    }
                    None => EventResult::Continue,
                },
                _ => EventResult::Continue,
            }
        }
        QuizPhase::Finished => match key.code {
            KeyCode::Enter => {
                app.reset_quiz();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        },
    }
}

/// Handle keys in INSERT mode (free text input)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Exit insert mode
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }

        // Submit input
        KeyCode::Enter => match app.submit_input() {
            Some(problem) => EventResult::Request(PendingRequest::Solve(problem)),
            None => EventResult::NeedsRedraw,
        },

        // Input editing
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.history_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.history_next();
            EventResult::NeedsRedraw
        }

        // Character input
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
