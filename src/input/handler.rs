use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

/// Handle keyboard input events. Returns `true` when the app should quit.
///
/// A failed store operation is shown in the status bar; the app keeps running.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> Result<bool> {
    app.last_error = None;
    let result = match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key, now),
        UiMode::AddingTask | UiMode::EditingTask => handle_form_mode(app, key, now),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key, now),
        UiMode::Warning => handle_warning_mode(app, key),
        UiMode::CompletionPrompt => handle_completion_mode(app, key, now),
    };
    match result {
        Ok(quit) => Ok(quit),
        Err(err) => {
            warn!(error = %err, "task update failed");
            app.last_error = Some(format!("Error: {}", err));
            Ok(false)
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Add task
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task(now);
            Ok(false)
        }

        // Edit selected task
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_task();
            Ok(false)
        }

        // Mark done / reopen
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Enter => {
            app.toggle_selected_completion(now)?;
            Ok(false)
        }

        // Delete (asks first)
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
            app.request_delete();
            Ok(false)
        }

        // Toggle completed tasks in the list
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.toggle_show_all();
            Ok(false)
        }

        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.toggle_stats();
            Ok(false)
        }

        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys in the add/edit form
fn handle_form_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_form(now)?;
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_form();
            Ok(false)
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_next_field();
            Ok(false)
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_prev_field();
            Ok(false)
        }
        KeyCode::Left | KeyCode::Right => {
            app.form_cycle_choice();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.form_backspace();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.form_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.confirm_delete(now)?;
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_delete();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Any of these keys closes the warning; it does not come back for this window
fn handle_warning_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') | KeyCode::Char('O') => {
            app.dismiss_warning();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle the "did you finish?" prompt
fn handle_completion_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.resolve_completion(true, now)?;
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.resolve_completion(false, now)?;
            Ok(false)
        }
        // Snooze choices are numbered from 1
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let index = c as usize - '1' as usize;
            app.snooze_option(index, now)?;
            Ok(false)
        }
        _ => Ok(false),
    }
}
