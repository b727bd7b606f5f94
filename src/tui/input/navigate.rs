use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::DateField;
use crate::tui::app::{App, PromptKind, Tab};

pub(super) fn handle_navigate(app: &mut App, mut key: KeyEvent, now: DateTime<Local>) {
    // Kitty protocol sends Shift+s as Char('s') + SHIFT
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.tab = app.tab.next(),
        KeyCode::BackTab => app.tab = app.tab.prev(),
        KeyCode::Char('1') => app.tab = Tab::Subtasks,
        KeyCode::Char('2') => app.tab = Tab::Comments,
        KeyCode::Char('3') => app.tab = Tab::Activities,
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char(' ') if app.tab == Tab::Subtasks => {
            app.task.toggle_subtask(app.subtask_cursor, now);
        }
        KeyCode::Char('a') => {
            app.tab = Tab::Subtasks;
            app.open_prompt(PromptKind::AddSubtask, "");
        }
        KeyCode::Char('s') => {
            let next = app.task.status.next();
            app.task.set_status(next, now);
        }
        KeyCode::Char('p') => {
            let next = app.task.priority.next();
            app.task.set_priority(next, now);
        }
        KeyCode::Char('m') => app.open_prompt(PromptKind::Assignee, ""),
        KeyCode::Char('t') => {
            let title = app.task.title.clone();
            app.open_prompt(PromptKind::Rename, &title);
        }
        KeyCode::Char('e') => {
            let description = app.task.description.clone();
            app.open_prompt(PromptKind::Description, &description);
        }
        KeyCode::Char('S') => open_date_prompt(app, DateField::Start),
        KeyCode::Char('D') => open_date_prompt(app, DateField::Due),
        KeyCode::Char('i') | KeyCode::Enter => app.focus_composer(),
        _ => {}
    }
}

fn open_date_prompt(app: &mut App, field: DateField) {
    let current = match field {
        DateField::Start => app.task.start_date,
        DateField::Due => app.task.due_date,
    };
    let initial = current.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    app.open_prompt(PromptKind::Date(field), &initial);
}

/// j/k: subtask cursor, thread scroll (up = older) or activity scroll.
fn move_cursor(app: &mut App, delta: isize) {
    match app.tab {
        Tab::Subtasks => {
            let len = app.task.subtasks.len();
            if len > 0 {
                app.subtask_cursor = app.subtask_cursor.saturating_add_signed(delta).min(len - 1);
            }
        }
        Tab::Comments => {
            app.thread_scroll = app.thread_scroll.saturating_add_signed(-delta);
        }
        Tab::Activities => {
            app.activity_scroll = app.activity_scroll.saturating_add_signed(delta);
        }
    }
}
