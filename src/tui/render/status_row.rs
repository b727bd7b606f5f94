use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, Tab};

use super::helpers::with_right_hint;

/// Key hints for the current mode and focus
fn hint(app: &App) -> &'static str {
    match app.mode {
        Mode::Navigate => match app.tab {
            Tab::Subtasks => "j/k move  Space toggle  a add  Tab next  q quit",
            Tab::Comments => "i write  j/k scroll  s status  p priority  q quit",
            Tab::Activities => "j/k scroll  Tab next  q quit",
        },
        Mode::Compose if app.composer.suggestions().is_open() => {
            "\u{2191}\u{2193} choose  Enter insert  Esc dismiss"
        }
        Mode::Compose if app.composer.emoji().is_open() => {
            "arrows move  Enter pick  Esc close"
        }
        Mode::Compose => "Alt+E emoji  Alt+M mention  Alt+A attach  Alt+T toolbar",
        Mode::Prompt => "Enter ok  Esc cancel",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let left = match (&app.status_message, app.mode) {
        (Some(message), _) => Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.yellow).bg(bg),
        ),
        (None, Mode::Compose) => Span::styled(
            " -- COMPOSE --",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        (None, _) => Span::styled(format!(" {}", app.user()), dim),
    };

    let hint = if app.config.ui.show_key_hints {
        format!("{} ", hint(app))
    } else {
        String::new()
    };
    let line = with_right_hint(vec![left], hint, dim, Style::default().bg(bg), width);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn row(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_user_and_tab_hints() {
        let app = demo_app();
        let output = row(&app);
        assert!(output.starts_with(" Jason Duong"));
        assert!(output.ends_with("i write  j/k scroll  s status  p priority  q quit"));
    }

    #[test]
    fn compose_hints_follow_the_open_popup() {
        let mut app = demo_app();
        app.focus_composer();
        assert!(row(&app).contains("-- COMPOSE --"));
        app.composer.open_mention();
        assert!(row(&app).ends_with("Enter insert  Esc dismiss"));
    }

    #[test]
    fn status_message_wins_and_hints_can_be_hidden() {
        let mut app = demo_app();
        app.config.ui.show_key_hints = false;
        app.set_status("removed notes.txt");
        assert_eq!(row(&app), " removed notes.txt");
    }
}
