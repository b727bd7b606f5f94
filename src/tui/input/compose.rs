use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::composer::Outcome;
use crate::tui::app::{App, PromptKind};

pub(super) fn handle_compose(app: &mut App, key: KeyEvent, now: DateTime<Local>) {
    let mods = key.modifiers;
    if mods == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Alt shortcuts stand in for the composer's toolbar buttons
    if mods.contains(KeyModifiers::ALT)
        && !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
        && let KeyCode::Char(c) = key.code
        && handle_toolbar_shortcut(app, c.to_ascii_lowercase())
    {
        return;
    }

    match app.composer.handle_key(key) {
        Outcome::Submit => app.submit_comment(now),
        Outcome::PromptLink => app.open_prompt(PromptKind::Link, ""),
        Outcome::Ignored if key.code == KeyCode::Esc => app.leave_composer(),
        Outcome::Consumed | Outcome::Edited | Outcome::Ignored => {}
    }
}

fn handle_toolbar_shortcut(app: &mut App, c: char) -> bool {
    match c {
        'e' => app.composer.toggle_emoji(),
        'm' => app.composer.open_mention(),
        'a' => app.open_prompt(PromptKind::Attach, ""),
        'x' => match app.composer.attachments_mut().remove_last() {
            Some(removed) => app.set_status(format!("removed {}", removed.name)),
            None => app.set_status("no attachments"),
        },
        't' => app.composer.toggle_toolbar(),
        _ => return false,
    }
    true
}
