/// Emoji shown per picker row
pub const GRID_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiCategory {
    pub name: &'static str,
    pub emojis: &'static [&'static str],
}

pub const EMOJI_CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "Smileys",
        emojis: &[
            "😀", "😃", "😄", "😁", "😅", "😂", "🤣", "😊", "😇", "🥰", "😍", "🤩", "😘", "😋",
            "🤔", "😐", "🙄", "😤", "😢", "😭",
        ],
    },
    EmojiCategory {
        name: "Gestures",
        emojis: &[
            "👍", "👎", "👋", "✋", "🤝", "👏", "🙌", "✌\u{fe0f}", "🤞", "💪", "🙏", "✍\u{fe0f}",
        ],
    },
    EmojiCategory {
        name: "Hearts",
        emojis: &[
            "❤\u{fe0f}", "🧡", "💛", "💚", "💙", "💜", "🖤", "💔", "💕", "💖",
        ],
    },
    EmojiCategory {
        name: "Objects",
        emojis: &[
            "⭐", "🌟", "✨", "💫", "🔥", "💯", "🎉", "🎊", "🏆", "💡", "📌", "🔔",
        ],
    },
];

/// Cursor into the picker grid: category plus index within it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridPos {
    pub category: usize,
    pub index: usize,
}

/// Toggleable emoji grid with keyboard navigation.
#[derive(Debug, Clone, Default)]
pub struct EmojiPicker {
    open: bool,
    pos: GridPos,
}

impl EmojiPicker {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn position(&self) -> GridPos {
        self.pos
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            self.pos = GridPos::default();
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn current(&self) -> Option<&'static str> {
        EMOJI_CATEGORIES
            .get(self.pos.category)?
            .emojis
            .get(self.pos.index)
            .copied()
    }

    /// Step left or right through the flattened list, wrapping.
    pub fn move_horizontal(&mut self, forward: bool) {
        let flat: Vec<GridPos> = all_positions().collect();
        let Some(at) = flat.iter().position(|p| *p == self.pos) else {
            return;
        };
        let next = if forward {
            (at + 1) % flat.len()
        } else {
            (at + flat.len() - 1) % flat.len()
        };
        self.pos = flat[next];
    }

    /// Step one grid row up or down, crossing category boundaries and
    /// clamping the column to the shorter row.
    pub fn move_vertical(&mut self, down: bool) {
        let rows = grid_rows();
        let Some(row) = rows.iter().position(|r| {
            r.category == self.pos.category
                && (r.start..r.start + r.len).contains(&self.pos.index)
        }) else {
            return;
        };
        let target = if down {
            (row + 1) % rows.len()
        } else {
            (row + rows.len() - 1) % rows.len()
        };
        let column = self.pos.index - rows[row].start;
        let dest = rows[target];
        self.pos = GridPos {
            category: dest.category,
            index: dest.start + column.min(dest.len - 1),
        };
    }

    /// Take the highlighted emoji and close the picker.
    pub fn choose(&mut self) -> Option<&'static str> {
        let emoji = self.current()?;
        self.close();
        Some(emoji)
    }
}

/// One rendered row of the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow {
    pub category: usize,
    pub start: usize,
    pub len: usize,
}

pub fn grid_rows() -> Vec<GridRow> {
    EMOJI_CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(category, c)| {
            (0..c.emojis.len())
                .step_by(GRID_COLUMNS)
                .map(move |start| GridRow {
                    category,
                    start,
                    len: (c.emojis.len() - start).min(GRID_COLUMNS),
                })
        })
        .collect()
}

fn all_positions() -> impl Iterator<Item = GridPos> {
    EMOJI_CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(category, c)| (0..c.emojis.len()).map(move |index| GridPos { category, index }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_opens_at_first_emoji() {
        let mut p = EmojiPicker::default();
        p.toggle();
        assert!(p.is_open());
        assert_eq!(p.current(), Some("😀"));
        p.toggle();
        assert!(!p.is_open());
    }

    #[test]
    fn rows_split_categories_into_eights() {
        let rows = grid_rows();
        let lens: Vec<usize> = rows.iter().map(|r| r.len).collect();
        assert_eq!(lens, vec![8, 8, 4, 8, 4, 8, 2, 8, 4]);
    }

    #[test]
    fn horizontal_wraps_across_categories() {
        let mut p = EmojiPicker::default();
        p.toggle();
        p.move_horizontal(false);
        assert_eq!(p.current(), Some("🔔"));
        p.move_horizontal(true);
        assert_eq!(p.current(), Some("😀"));
        for _ in 0..20 {
            p.move_horizontal(true);
        }
        assert_eq!(p.current(), Some("👍"));
    }

    #[test]
    fn vertical_clamps_to_short_rows() {
        let mut p = EmojiPicker::default();
        p.toggle();
        for _ in 0..7 {
            p.move_horizontal(true);
        }
        p.move_vertical(true);
        p.move_vertical(true);
        assert_eq!(
            p.position(),
            GridPos {
                category: 0,
                index: 19
            }
        );
        p.move_vertical(true);
        assert_eq!(p.position(), GridPos { category: 1, index: 3 });
    }

    #[test]
    fn choose_returns_emoji_and_closes() {
        let mut p = EmojiPicker::default();
        p.toggle();
        p.move_horizontal(true);
        assert_eq!(p.choose(), Some("😃"));
        assert!(!p.is_open());
    }
}
