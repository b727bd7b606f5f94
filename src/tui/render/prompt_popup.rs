use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

/// Render the one-line prompt centered in `area`, with the cursor in its input
pub fn render_prompt_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let input_style = Style::default().fg(app.theme.text_bright).bg(bg);

    let popup_w: u16 = 60.min(area.width.saturating_sub(4)).max(10);
    let popup_h: u16 = if prompt.error.is_some() { 4 } else { 3 };
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h.min(area.height));

    // Keep the cursor inside the box by scrolling long input horizontally
    let inner_w = popup_w.saturating_sub(4) as usize;
    let before: String = prompt.input.chars().take(prompt.cursor).collect();
    let cursor_col = unicode::display_width(&before);
    let skip_cols = cursor_col.saturating_sub(inner_w.saturating_sub(1));
    let mut shown = String::new();
    let mut col = 0;
    for g in unicode::graphemes(&prompt.input) {
        let w = unicode::grapheme_display_width(g);
        if col >= skip_cols {
            if col + w > skip_cols + inner_w {
                break;
            }
            shown.push_str(g);
        }
        col += w;
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(" ", input_style),
        Span::styled(shown, input_style),
    ])];
    if let Some(error) = &prompt.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg))
        .title(Span::styled(format!(" {} ", prompt.kind.title()), header_style))
        .title_bottom(
            Line::from(Span::styled(
                " Enter ok \u{00B7} Esc cancel ",
                Style::default().fg(app.theme.dim).bg(bg),
            ))
            .right_aligned(),
        );
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);

    let cursor_x = popup_area.x + 2 + (cursor_col - skip_cols) as u16;
    frame.set_cursor_position(Position::new(cursor_x, popup_area.y + 1));
}
