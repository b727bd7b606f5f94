use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

const BAR_WIDTH: usize = 20;

/// Render the subtask checklist with its progress bar
pub fn render_subtasks(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let (done, total, percent) = app.task.progress();

    let filled = BAR_WIDTH * percent as usize / 100;
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(format!(" Progress {}/{}  ", done, total), dim),
            Span::styled(
                "\u{2588}".repeat(filled),
                Style::default().fg(app.theme.green).bg(bg),
            ),
            Span::styled("\u{2591}".repeat(BAR_WIDTH - filled), dim),
            Span::styled(format!(" {}%", percent), dim),
        ]),
        Line::from(""),
    ];

    if app.task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled(" No subtasks yet (a to add)", dim)));
    }

    // Row index of each subtask's first line, for scrolling the cursor into view
    let mut cursor_row = 0;
    for (i, subtask) in app.task.subtasks.iter().enumerate() {
        let selected = i == app.subtask_cursor;
        if selected {
            cursor_row = lines.len();
        }
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let check = if subtask.done { "[x]" } else { "[ ]" };
        let mut name_style = Style::default().fg(app.theme.text).bg(row_bg);
        if subtask.done {
            name_style = name_style.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT);
        }
        let marker = if selected { " \u{25B8} " } else { "   " };
        let name = unicode::truncate_to_width(&subtask.name, width.saturating_sub(8));
        let used = 3 + 4 + unicode::display_width(&name);
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(
                format!("{} ", check),
                Style::default()
                    .fg(if subtask.done { app.theme.green } else { app.theme.text })
                    .bg(row_bg),
            ),
            Span::styled(name, name_style),
            Span::styled(
                " ".repeat(width.saturating_sub(used)),
                Style::default().bg(row_bg),
            ),
        ]));
        if let Some(note) = &subtask.note {
            lines.push(Line::from(Span::styled(
                format!(
                    "       {}",
                    unicode::truncate_to_width(note, width.saturating_sub(8))
                ),
                Style::default()
                    .fg(app.theme.yellow)
                    .bg(bg)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let height = area.height as usize;
    let scroll = (cursor_row + 2).saturating_sub(height);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_progress_and_notes() {
        let app = demo_app();
        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_subtasks(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with(" Progress 2/4"));
        assert!(lines[0].ends_with("50%"));
        assert_eq!(lines[2], " \u{25B8} [x] Understanding client design brief");
        assert!(lines[3].contains("Blocker : The brief"));
        assert_eq!(lines[4], "   [x] Collect moodboards about KPI programs");
        assert_eq!(lines[5], "   [ ] Meeting & Mind Mapping with Tyler");
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let mut app = demo_app();
        app.subtask_cursor = 3;
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_subtasks(frame, &app, area);
        });
        assert!(output.contains("\u{25B8} [ ] Wireframing"));
    }
}
