use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::initials;
use crate::tui::app::App;
use crate::util::time::{short_date, time_ago};
use crate::util::unicode;

use super::helpers::with_right_hint;

/// Render the activity feed, newest first
pub fn render_activities(frame: &mut Frame, app: &mut App, area: Rect, now: DateTime<Local>) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let mut lines: Vec<Line> = Vec::new();

    for activity in app.task.activities.entries() {
        let when = format!(
            "{} \u{00B7} {} ",
            short_date(activity.timestamp.date_naive()),
            time_ago(activity.timestamp, now)
        );
        let mut action = activity.action.clone();
        if let Some(name) = &activity.task_name {
            action.push(' ');
            action.push_str(name);
        }
        let room = width.saturating_sub(5 + unicode::display_width(&activity.user) + 2);
        let spans = vec![
            Span::styled(" ", dim),
            Span::styled(
                unicode::pad_to_width(&initials(&activity.user), 3),
                Style::default()
                    .fg(app.theme.mention_color(&activity.user))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", dim),
            Span::styled(
                activity.user.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", dim),
            Span::styled(
                unicode::truncate_to_width(&action, room),
                Style::default().fg(app.theme.text).bg(bg),
            ),
        ];
        lines.push(with_right_hint(spans, when, dim, Style::default().bg(bg), width));
        if let Some(summary) = activity.detail.summary() {
            lines.push(Line::from(Span::styled(
                format!(
                    "     {}",
                    unicode::truncate_to_width(&summary, width.saturating_sub(6))
                ),
                Style::default().fg(app.theme.purple).bg(bg),
            )));
        }
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(" No activity yet", dim)));
    }

    let max_scroll = lines.len().saturating_sub(area.height as usize);
    app.activity_scroll = app.activity_scroll.min(max_scroll);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((u16::try_from(app.activity_scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn newest_entry_comes_first_with_summary() {
        let mut app = demo_app();
        let now = Local::now();
        app.task.set_status(Status::Done, now);
        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_activities(frame, &mut app, area, now);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with(" JD  Jason Duong changed status"));
        assert!(lines[0].ends_with("just now"));
        assert_eq!(lines[1], "     In Progress \u{2192} Done");
        assert!(lines[3].starts_with(" R   Rahmadini created task Design System"));
        assert!(lines[3].contains("Jan 7, 2024"));
    }
}
