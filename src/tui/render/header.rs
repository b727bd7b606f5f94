use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::initials;
use crate::tui::app::App;
use crate::util::time::long_date;
use crate::util::unicode;

/// Task title, metadata row and description (3 rows)
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let task = &app.task;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);
    let width = area.width as usize;

    let title = Line::from(vec![
        Span::styled(" ", value),
        Span::styled(
            unicode::truncate_to_width(&task.title, width.saturating_sub(2)),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let assignees = if task.assignees.is_empty() {
        "\u{2014}".to_string()
    } else {
        task.assignees
            .iter()
            .map(|name| initials(name))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let date = |d: Option<chrono::NaiveDate>| d.map_or("\u{2014}".to_string(), long_date);

    let meta = Line::from(vec![
        Span::styled(" Status ", label),
        Span::styled(
            task.status.label(),
            Style::default().fg(app.theme.status_color(task.status)).bg(bg),
        ),
        Span::styled("  Priority ", label),
        Span::styled(
            task.priority.label(),
            Style::default()
                .fg(app.theme.priority_color(task.priority))
                .bg(bg),
        ),
        Span::styled("  Assignees ", label),
        Span::styled(assignees, value),
        Span::styled("  Start ", label),
        Span::styled(date(task.start_date), value),
        Span::styled("  Due ", label),
        Span::styled(date(task.due_date), value),
    ]);

    let description = if task.description.is_empty() {
        "No description".to_string()
    } else {
        task.description.clone()
    };
    let description = Line::from(Span::styled(
        format!(" {}", unicode::truncate_to_width(&description, width.saturating_sub(2))),
        label,
    ));

    let paragraph = Paragraph::new(vec![title, meta, description]).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn header_shows_title_and_metadata() {
        let app = demo_app();
        let output = render_to_string(100, 3, |frame, area| {
            render_header(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], " Design System");
        assert!(lines[1].contains("Status In Progress"));
        assert!(lines[1].contains("Priority High"));
        assert!(lines[1].contains("Assignees DA AN A"));
        assert!(lines[1].contains("Start January 7, 2024"));
        assert!(lines[1].contains("Due \u{2014}"));
        assert!(lines[2].starts_with(" Build the KPI dashboard"));
    }
}
