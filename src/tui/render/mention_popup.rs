use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

/// Maximum number of visible entries in the dropdown
const MAX_VISIBLE: usize = 5;

/// Render the mention dropdown floating below the trigger text
pub fn render_mention_popup(frame: &mut Frame, app: &App) {
    let Some(anchor) = app.mention_anchor else {
        return;
    };
    let Some(session) = app.composer.suggestions().session() else {
        return;
    };
    if session.candidates.is_empty() {
        return;
    }

    let bg = app.theme.background;
    let count = session.candidates.len().min(MAX_VISIBLE);

    // Widest name plus initials column and padding
    let max_width = session
        .candidates
        .iter()
        .map(|m| unicode::display_width(&m.name))
        .max()
        .unwrap_or(10)
        + 9;

    let term_area = frame.area();
    let popup_w = (max_width as u16).min(term_area.width).max(16);
    let popup_h = (count as u16) + 2; // +2 for borders

    // Below the trigger, or above it when there is no room
    let below = anchor.y + anchor.height;
    let y = if below + popup_h <= term_area.height {
        below
    } else {
        anchor.y.saturating_sub(popup_h)
    };
    let x = anchor.x.min(term_area.width.saturating_sub(popup_w));
    let popup_area = Rect::new(x, y, popup_w, popup_h.min(term_area.height));

    // Scroll window around selected item
    let scroll_start = if session.selected >= MAX_VISIBLE {
        session.selected - MAX_VISIBLE + 1
    } else {
        0
    };

    let inner_w = (popup_w as usize).saturating_sub(2);
    let mut lines: Vec<Line> = Vec::new();
    for (i, member) in session
        .candidates
        .iter()
        .skip(scroll_start)
        .take(MAX_VISIBLE)
        .enumerate()
    {
        let is_selected = scroll_start + i == session.selected;
        let row_bg = if is_selected { app.theme.selection_bg } else { bg };
        let style = if is_selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };

        let prefix = if is_selected { " \u{25B8} " } else { "   " };
        let chip = unicode::pad_to_width(&member.initials(), 3);
        let name = unicode::pad_to_width(
            &unicode::truncate_to_width(&member.name, inner_w.saturating_sub(7)),
            inner_w.saturating_sub(7),
        );
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(
                chip,
                Style::default()
                    .fg(app.theme.mention_color(&member.name))
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", style),
            Span::styled(name, style),
        ]));
    }

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}
