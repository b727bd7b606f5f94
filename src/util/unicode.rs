use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells a tab occupies in the composer and thread.
const TAB_CELLS: usize = 4;

/// Display width of a grapheme cluster.
pub fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        TAB_CELLS
    } else {
        UnicodeWidthStr::width(g)
    }
}

/// Split text into extended grapheme clusters, one cursor unit each.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    graphemes(s).map(grapheme_display_width).sum()
}

/// Fit `s` into `max_cells`, ending in `…` when something had to go. Wide
/// graphemes are never split.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let Some(budget) = max_cells.checked_sub(1) else {
        return String::new();
    };
    let mut used = 0;
    let mut kept: String = graphemes(s)
        .take_while(|g| {
            used += grapheme_display_width(g);
            used <= budget
        })
        .collect();
    kept.push('\u{2026}');
    kept
}

/// Pad with spaces on the right up to `cells` display columns.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    if w >= cells {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(cells - w))
}

/// Truncate to a number of characters, appending `...` when anything was cut.
pub fn ellipsize_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
