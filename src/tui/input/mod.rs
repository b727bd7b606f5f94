mod compose;
mod navigate;
mod prompt;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use compose::handle_compose;
use navigate::handle_navigate;
use prompt::handle_prompt;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: DateTime<Local>) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key, now),
        Mode::Compose => handle_compose(app, key, now),
        Mode::Prompt => handle_prompt(app, key, now),
    }
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
pub fn handle_paste(app: &mut App, text: &str) {
    match app.mode {
        Mode::Compose => app.composer.paste(text),
        Mode::Prompt => {
            if let Some(prompt) = &mut app.prompt {
                prompt.insert_str(text);
            }
        }
        Mode::Navigate => {}
    }
}
