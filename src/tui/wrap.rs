use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode;

/// One screen row produced by wrapping a styled line.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedRow {
    pub line: Line<'static>,
    /// Display column in the unwrapped line where this row starts
    pub start_col: usize,
}

/// A grapheme with the style of the span it came from.
struct Cell {
    text: String,
    style: Style,
    width: usize,
}

fn cells(line: &Line<'_>) -> Vec<Cell> {
    let mut out = Vec::new();
    for span in &line.spans {
        let style = line.style.patch(span.style);
        for g in span.content.graphemes(true) {
            out.push(Cell {
                text: g.to_string(),
                style,
                width: unicode::grapheme_display_width(g),
            });
        }
    }
    out
}

fn is_space(cell: &Cell) -> bool {
    cell.text.chars().all(char::is_whitespace)
}

/// Rebuild spans from a run of cells, merging neighbours with equal style.
fn build_line(cells: &[Cell]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut style: Option<Style> = None;
    for cell in cells {
        if style.is_some_and(|s| s != cell.style) {
            spans.push(Span::styled(std::mem::take(&mut text), style.unwrap_or_default()));
        }
        style = Some(cell.style);
        text.push_str(&cell.text);
    }
    if let Some(style) = style {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

/// Wrap a styled line to `width` cells.
///
/// Breaks prefer whitespace (which is dropped at the break), then the
/// position after a hyphen. A word wider than the row is split between
/// graphemes.
pub fn wrap_line(line: &Line<'_>, width: usize) -> Vec<WrappedRow> {
    let cells = cells(line);
    let total = cells.len();
    let line_width: usize = cells.iter().map(|c| c.width).sum();
    if width == 0 || line_width <= width {
        return vec![WrappedRow {
            line: build_line(&cells),
            start_col: 0,
        }];
    }

    // (start, end) cell ranges of each row
    let mut rows: Vec<(usize, usize)> = Vec::new();
    let mut row_start = 0;
    let mut col = 0;
    let mut i = 0;

    while i < total {
        let token_start = i;
        let ws = is_space(&cells[i]);
        if ws {
            while i < total && is_space(&cells[i]) {
                i += 1;
            }
        } else {
            while i < total && !is_space(&cells[i]) {
                let hyphen = cells[i].text == "-";
                i += 1;
                if hyphen && i < total && !is_space(&cells[i]) {
                    break;
                }
            }
        }

        let token_width: usize = cells[token_start..i].iter().map(|c| c.width).sum();
        if col + token_width <= width {
            col += token_width;
            continue;
        }

        if ws {
            rows.push((row_start, token_start));
            row_start = i;
            col = 0;
            continue;
        }

        if col > 0 {
            rows.push((row_start, token_start));
            row_start = token_start;
            col = 0;
        }
        for (j, cell) in cells.iter().enumerate().take(i).skip(token_start) {
            if col + cell.width > width && col > 0 {
                rows.push((row_start, j));
                row_start = j;
                col = 0;
            }
            col += cell.width;
        }
    }
    rows.push((row_start, total));

    let mut offsets = Vec::with_capacity(total + 1);
    let mut acc = 0;
    for cell in &cells {
        offsets.push(acc);
        acc += cell.width;
    }
    offsets.push(acc);

    rows.into_iter()
        .map(|(start, mut end)| {
            while end > start && is_space(&cells[end - 1]) {
                end -= 1;
            }
            WrappedRow {
                line: build_line(&cells[start..end]),
                start_col: offsets[start],
            }
        })
        .collect()
}

/// Wrap every line and keep only the rows.
pub fn wrap_lines(lines: &[Line<'_>], width: usize) -> Vec<Line<'static>> {
    lines
        .iter()
        .flat_map(|line| wrap_line(line, width))
        .map(|row| row.line)
        .collect()
}

/// Row index and column within that row for display column `col` of the
/// unwrapped line.
pub fn locate(rows: &[WrappedRow], col: usize) -> (usize, usize) {
    let row = rows
        .iter()
        .rposition(|r| r.start_col <= col)
        .unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start_col);
    (row, col - start.min(col))
}
