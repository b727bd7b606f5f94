use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::composer::emoji::{EMOJI_CATEGORIES, GRID_COLUMNS, grid_rows};
use crate::tui::app::App;
use crate::util::unicode;

/// Cells per emoji: padding, two-cell glyph, padding
const CELL_WIDTH: u16 = 4;

/// Render the emoji picker just above `composer`, left-aligned with it
pub fn render_emoji_popup(frame: &mut Frame, app: &App, composer: Rect) {
    let picker = app.composer.emoji();
    if !picker.is_open() {
        return;
    }
    let pos = picker.position();
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    let mut last_category = None;
    for row in grid_rows() {
        let category = &EMOJI_CATEGORIES[row.category];
        if last_category != Some(row.category) {
            last_category = Some(row.category);
            let style = if row.category == pos.category {
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                dim
            };
            lines.push(Line::from(Span::styled(format!(" {}", category.name), style)));
        }
        let mut spans = Vec::with_capacity(row.len);
        for index in row.start..row.start + row.len {
            let selected = row.category == pos.category && index == pos.index;
            let style = if selected {
                Style::default().bg(app.theme.selection_bg)
            } else {
                Style::default().bg(bg)
            };
            spans.push(Span::styled(
                format!(" {} ", unicode::pad_to_width(category.emojis[index], 2)),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }

    let term = frame.area();
    let popup_w = (CELL_WIDTH * GRID_COLUMNS as u16 + 2).min(term.width);
    let popup_h = (lines.len() as u16 + 2).min(term.height);
    let y = composer.y.saturating_sub(popup_h);
    let x = composer.x.min(term.width.saturating_sub(popup_w));
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border).bg(bg))
        .style(Style::default().bg(bg))
        .title(Span::styled(" Emoji ", dim))
        .title_bottom(
            Line::from(Span::styled(
                " \u{2190}\u{2191}\u{2192}\u{2193} Enter Esc ",
                dim,
            ))
            .right_aligned(),
        );
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn closed_picker_draws_nothing() {
        let app = demo_app();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| {
            render_emoji_popup(frame, &app, Rect::new(0, 20, 80, 4));
        });
        assert_eq!(output, "");
    }

    #[test]
    fn open_picker_sits_above_the_composer() {
        let mut app = demo_app();
        app.composer.toggle_emoji();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| {
            render_emoji_popup(frame, &app, Rect::new(0, 20, 80, 4));
        });
        let lines: Vec<&str> = output.lines().collect();
        // 4 category titles + 9 emoji rows + 2 borders, ending on row 19
        assert_eq!(lines.len(), 20);
        assert!(lines[5].contains("Emoji"));
        assert!(lines[6].contains("Smileys"));
        assert!(lines[7].contains("😀"));
        assert!(lines[10].contains("Gestures"));
        assert!(lines[19].contains("Enter Esc"));
    }
}
