use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{BlockKind, Document, Pos};
use crate::tui::app::{App, Mode};
use crate::tui::theme::Theme;
use crate::tui::wrap::{self, WrappedRow};

use super::helpers::{document_lines, patch_columns};
use super::thread_view::attachment_line;

/// Editor rows shown before the composer starts scrolling
const MAX_EDITOR_ROWS: usize = 5;
/// Attachment rows shown before the rest collapse into "+N more"
const MAX_ATTACHMENT_ROWS: usize = 3;

/// Editor content wrapped to the composer width, with the row each block starts at.
struct EditorLayout {
    rows: Vec<WrappedRow>,
    /// Index into `rows` of each block's first row, plus the row count of each block
    block_rows: Vec<(usize, usize)>,
}

impl EditorLayout {
    fn build(lines: Vec<Line<'static>>, width: usize) -> Self {
        let mut rows = Vec::new();
        let mut block_rows = Vec::new();
        for line in &lines {
            let wrapped = wrap::wrap_line(line, width);
            block_rows.push((rows.len(), wrapped.len()));
            rows.extend(wrapped);
        }
        EditorLayout { rows, block_rows }
    }

    /// Editor row and column of a `(column, block)` cell
    fn locate(&self, (col, block): (u16, u16)) -> (usize, usize) {
        let Some(&(first, count)) = self.block_rows.get(block as usize) else {
            return (0, 0);
        };
        let (row, col) = wrap::locate(&self.rows[first..first + count], col as usize);
        (first + row, col)
    }
}

fn layout(doc: &Document, theme: &Theme, width: usize) -> EditorLayout {
    let base = Style::default().fg(theme.text_bright).bg(theme.background);
    let mut lines = document_lines(doc, theme, base);
    if let Some((start, end)) = doc.selection() {
        let selected = base.bg(theme.selection_bg);
        for block in start.block..=end.block {
            let from = if block == start.block {
                doc.cell_of(start).0 as usize
            } else {
                doc.cell_of(Pos::new(block, 0)).0 as usize
            };
            let to = if block == end.block {
                doc.cell_of(end).0 as usize
            } else {
                usize::MAX
            };
            let line = std::mem::take(&mut lines[block]);
            lines[block] = patch_columns(line, from, to, selected);
        }
    }
    EditorLayout::build(lines, width)
}

fn inner_width(area_width: u16) -> usize {
    area_width.saturating_sub(2) as usize
}

/// Rows the composer wants at `width`: border, toolbar, editor and attachments
pub fn composer_height(app: &App, width: u16) -> u16 {
    let composer = &app.composer;
    let editor = layout(composer.document(), &app.theme, inner_width(width).saturating_sub(1))
        .rows
        .len()
        .clamp(1, MAX_EDITOR_ROWS);
    let toolbar = usize::from(composer.show_toolbar());
    let attachments = composer.attachments().len().min(MAX_ATTACHMENT_ROWS);
    u16::try_from(2 + toolbar + editor + attachments).unwrap_or(u16::MAX)
}

/// Render the comment composer and record where its mention trigger sits.
pub fn render_composer(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let focused = matches!(app.mode, Mode::Compose)
        || app
            .prompt
            .as_ref()
            .is_some_and(|p| p.return_mode == Mode::Compose);
    let border = if focused { theme.highlight } else { theme.border };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg))
        .title(Span::styled(
            " Comment ",
            Style::default().fg(theme.text_bright).bg(bg),
        ));
    if focused {
        block = block.title_bottom(
            Line::from(Span::styled(
                " Enter send \u{00B7} Shift+Enter newline \u{00B7} Esc leave ",
                Style::default().fg(theme.dim).bg(bg),
            ))
            .right_aligned(),
        );
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        app.mention_anchor = None;
        return;
    }

    let composer = &app.composer;
    let mut y = inner.y;
    if composer.show_toolbar() {
        frame.render_widget(
            Paragraph::new(toolbar_line(theme, composer.document())),
            Rect::new(inner.x, y, inner.width, 1),
        );
        y += 1;
    }

    let attachment_rows = composer.attachments().len().min(MAX_ATTACHMENT_ROWS) as u16;
    let editor_height = inner
        .height
        .saturating_sub(y - inner.y)
        .saturating_sub(attachment_rows);
    // One column of left padding inside the border
    let editor = Rect::new(
        inner.x + 1,
        y,
        inner.width.saturating_sub(1),
        editor_height,
    );

    let doc = composer.document();
    let layout = layout(doc, theme, editor.width as usize);
    let visible = editor.height as usize;
    let (cursor_row, cursor_col) = layout.locate(doc.cell_of(doc.cursor()));

    let mut scroll = app.composer_scroll.min(layout.rows.len().saturating_sub(visible));
    if cursor_row < scroll {
        scroll = cursor_row;
    } else if visible > 0 && cursor_row >= scroll + visible {
        scroll = cursor_row + 1 - visible;
    }

    if doc.plain_text().is_empty() && doc.current_block_kind() == BlockKind::Paragraph {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Write a comment...",
                Style::default()
                    .fg(theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::ITALIC),
            )),
            editor,
        );
    } else {
        let lines: Vec<Line> = layout
            .rows
            .iter()
            .skip(scroll)
            .take(visible)
            .map(|row| row.line.clone())
            .collect();
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(bg)),
            editor,
        );
    }

    if attachment_rows > 0 {
        let items = composer.attachments().items();
        let shown = if items.len() > MAX_ATTACHMENT_ROWS {
            MAX_ATTACHMENT_ROWS - 1
        } else {
            items.len()
        };
        let width = inner.width.saturating_sub(1) as usize;
        let mut lines: Vec<Line> = items
            .iter()
            .take(shown)
            .map(|a| attachment_line(theme, a, width))
            .collect();
        if shown < items.len() {
            lines.push(Line::from(Span::styled(
                format!("+{} more", items.len() - shown),
                Style::default().fg(theme.dim).bg(bg),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(bg)),
            Rect::new(
                inner.x + 1,
                inner.y + inner.height - attachment_rows,
                inner.width.saturating_sub(1),
                attachment_rows,
            ),
        );
    }

    let to_screen = |row: usize, col: usize| -> Option<(u16, u16)> {
        let row = row.checked_sub(scroll)?;
        if row >= visible {
            return None;
        }
        let col = col.min(editor.width.saturating_sub(1) as usize);
        Some((editor.x + col as u16, editor.y + row as u16))
    };

    let anchor = composer.suggestions().session().and_then(|session| {
        let (row, col) = layout.locate((session.anchor.x, session.anchor.y));
        let (x, y) = to_screen(row, col)?;
        Some(Rect::new(x, y, session.anchor.width.max(1), 1))
    });

    if app.mode == Mode::Compose
        && !composer.emoji().is_open()
        && let Some((x, y)) = to_screen(cursor_row, cursor_col)
    {
        frame.set_cursor_position(Position::new(x, y));
    }

    app.mention_anchor = anchor;
    app.composer_scroll = scroll;
}

/// Mark and block buttons, lit when active at the cursor
fn toolbar_line(theme: &Theme, doc: &Document) -> Line<'static> {
    let marks = doc.active_marks();
    let kind = doc.current_block_kind();
    let buttons = [
        ("B", marks.bold),
        ("I", marks.italic),
        ("U", marks.underline),
        ("S", marks.strike),
        ("<>", marks.code),
        ("\u{1F517}", marks.link.is_some()),
        ("\u{275D}", kind == BlockKind::Blockquote),
        ("\u{2022}", kind == BlockKind::BulletItem),
        ("1.", kind == BlockKind::OrderedItem),
        ("{}", kind == BlockKind::CodeBlock),
    ];
    let bg = theme.background;
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for (label, active) in buttons {
        let style = if active {
            Style::default()
                .fg(theme.highlight)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }
    spans.push(Span::styled(
        "  @ mention",
        Style::default().fg(theme.dim).bg(bg),
    ));
    Line::from(spans)
}
