use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Attachment, Comment, initials};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::tui::wrap;
use crate::util::time::time_ago;
use crate::util::unicode;

use super::helpers::document_lines;

/// Body text is indented past the author's initials
const INDENT: usize = 5;

/// Render the comment thread, newest at the bottom.
///
/// `thread_scroll` counts rows scrolled up from the bottom and is clamped here.
pub fn render_thread(frame: &mut Frame, app: &mut App, area: Rect, now: DateTime<Local>) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();

    if app.thread.is_empty() {
        lines.push(Line::from(Span::styled(
            " No comments yet",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let first_unread = app.thread.first_unread();
    for (i, comment) in app.thread.comments().iter().enumerate() {
        if first_unread == Some(i) {
            lines.push(divider(&app.theme, "New Messages", width));
        }
        lines.extend(comment_lines(&app.theme, comment, width, now));
        lines.push(Line::from(""));
    }

    let height = area.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    app.thread_scroll = app.thread_scroll.min(max_scroll);
    let top = max_scroll - app.thread_scroll;

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

fn comment_lines(
    theme: &Theme,
    comment: &Comment,
    width: usize,
    now: DateTime<Local>,
) -> Vec<Line<'static>> {
    let bg = theme.background;
    let color = theme.mention_color(&comment.author);
    let mut lines = vec![Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            unicode::pad_to_width(&initials(&comment.author), 3),
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            comment.author.clone(),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", time_ago(comment.timestamp, now)),
            Style::default().fg(theme.dim).bg(bg),
        ),
    ])];

    let body_width = width.saturating_sub(INDENT + 1);
    let base = Style::default().fg(theme.text).bg(bg);
    if comment.has_text() {
        for row in wrap::wrap_lines(&document_lines(&comment.body, theme, base), body_width) {
            lines.push(indented(row, bg));
        }
    }
    for attachment in &comment.attachments {
        lines.push(indented(attachment_line(theme, attachment, body_width), bg));
    }
    lines
}

fn indented(line: Line<'static>, bg: ratatui::style::Color) -> Line<'static> {
    let mut spans = vec![Span::styled(" ".repeat(INDENT), Style::default().bg(bg))];
    spans.extend(line.spans);
    Line::from(spans)
}

/// Icon, name and size of a file, with its preview summary when known
pub(super) fn attachment_line(
    theme: &Theme,
    attachment: &Attachment,
    width: usize,
) -> Line<'static> {
    let bg = theme.background;
    let icon = format!("[{}] ", attachment.kind().icon());
    let size = format!("  {}", attachment.size_label());
    let preview = attachment
        .preview
        .as_ref()
        .map(|p| format!("  {}", p.summary()))
        .unwrap_or_default();
    let fixed = unicode::display_width(&icon) + unicode::display_width(&size);
    let room = width.saturating_sub(fixed);
    let name = unicode::truncate_to_width(&attachment.name, room);
    let preview = unicode::truncate_to_width(
        &preview,
        room.saturating_sub(unicode::display_width(&name)),
    );
    Line::from(vec![
        Span::styled(icon, Style::default().fg(theme.cyan).bg(bg)),
        Span::styled(
            name,
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Span::styled(size, Style::default().fg(theme.dim).bg(bg)),
        Span::styled(
            preview,
            Style::default()
                .fg(theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// "──── label ────" across the full width
fn divider(theme: &Theme, label: &str, width: usize) -> Line<'static> {
    let label = format!(" {} ", label);
    let rest = width.saturating_sub(unicode::display_width(&label));
    let left = rest / 2;
    let style = Style::default().fg(theme.red).bg(theme.background);
    Line::from(vec![
        Span::styled("\u{2500}".repeat(left), style),
        Span::styled(label, style.add_modifier(Modifier::BOLD)),
        Span::styled("\u{2500}".repeat(rest - left), style),
    ])
}
