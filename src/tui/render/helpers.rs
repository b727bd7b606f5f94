use std::borrow::Cow;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{BlockKind, Document, Marks, Run, runs};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Style for text carrying `marks`, layered over `base`
pub(super) fn mark_style(theme: &Theme, marks: &Marks, base: Style) -> Style {
    let mut style = base;
    if marks.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if marks.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if marks.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if marks.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if marks.code {
        style = style.fg(theme.cyan);
    }
    if marks.link.is_some() {
        style = style.fg(theme.link).add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// One line per block of `doc`: gutter prefix, then styled runs and mention chips.
pub(super) fn document_lines(doc: &Document, theme: &Theme, base: Style) -> Vec<Line<'static>> {
    doc.blocks()
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let mut spans = Vec::new();
            let prefix = doc.block_prefix(index);
            if !prefix.is_empty() {
                spans.push(Span::styled(prefix, base.fg(theme.dim)));
            }
            let block_base = if block.kind == BlockKind::CodeBlock {
                base.fg(theme.cyan)
            } else {
                base
            };
            for run in runs(&block.atoms) {
                match run {
                    Run::Text { text, marks } => {
                        spans.push(Span::styled(text, mark_style(theme, marks, block_base)));
                    }
                    Run::Mention(token) => spans.push(Span::styled(
                        token.display(),
                        base.fg(theme.mention_color(&token.label))
                            .add_modifier(Modifier::BOLD),
                    )),
                }
            }
            Line::from(spans)
        })
        .collect()
}

/// Patch `style` onto the display columns `from..to` of a line
pub(super) fn patch_columns(
    line: Line<'static>,
    from: usize,
    to: usize,
    style: Style,
) -> Line<'static> {
    if from >= to {
        return line;
    }
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut col = 0;
    for span in line.spans {
        let styled = |hit: bool| {
            if hit {
                span.style.patch(style)
            } else {
                span.style
            }
        };
        let mut current = String::new();
        let mut current_hit: Option<bool> = None;
        for g in unicode::graphemes(&span.content) {
            let hit = (from..to).contains(&col);
            if let Some(prev) = current_hit
                && prev != hit
            {
                spans.push(Span::styled(std::mem::take(&mut current), styled(prev)));
            }
            current_hit = Some(hit);
            current.push_str(g);
            col += unicode::grapheme_display_width(g);
        }
        if let Some(hit) = current_hit {
            spans.push(Span::styled(current, styled(hit)));
        }
    }
    Line::from(spans)
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Left text and right-aligned hint on one line, hint dropped when it won't fit
pub(super) fn with_right_hint<'a>(
    mut spans: Vec<Span<'a>>,
    hint: impl Into<Cow<'a, str>>,
    hint_style: Style,
    fill: Style,
    width: usize,
) -> Line<'a> {
    let hint = hint.into();
    let content_width = spans_width(&spans);
    let hint_width = unicode::display_width(&hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), fill));
        spans.push(Span::styled(hint, hint_style));
    }
    Line::from(spans)
}
