use std::sync::LazyLock;

use regex::Regex;

use crate::util::unicode;

/// Bare URLs picked up by [`Document::autolink`]
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("valid url regex"));

/// An inline formatting mark that can be toggled on text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

/// The set of marks carried by one text grapheme
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strike => self.strike,
            Mark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
            Mark::Strike => self.strike = on,
            Mark::Code => self.code = on,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Marks::default()
    }
}

/// An atomic reference to a directory member embedded in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionToken {
    pub id: String,
    pub label: String,
}

impl MentionToken {
    pub fn display(&self) -> String {
        format!("@{}", self.label)
    }
}

/// One cursor unit of a block: a grapheme of text or a whole mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Text { grapheme: String, marks: Marks },
    Mention(MentionToken),
}

impl Atom {
    fn is_whitespace(&self) -> bool {
        match self {
            Atom::Text { grapheme, .. } => grapheme.chars().all(char::is_whitespace),
            Atom::Mention(_) => false,
        }
    }

    pub fn display_width(&self) -> usize {
        match self {
            Atom::Text { grapheme, .. } => unicode::grapheme_display_width(grapheme),
            Atom::Mention(token) => unicode::display_width(&token.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Blockquote,
    BulletItem,
    OrderedItem,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub atoms: Vec<Atom>,
}

impl Block {
    fn empty(kind: BlockKind) -> Self {
        Block {
            kind,
            atoms: Vec::new(),
        }
    }
}

/// A position between atoms: `offset` atoms into block `block`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub block: usize,
    pub offset: usize,
}

impl Pos {
    pub fn new(block: usize, offset: usize) -> Self {
        Pos { block, offset }
    }
}

/// An `@query` being typed: the `@` sits at `start`, the cursor at `end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub start: Pos,
    pub end: Pos,
    pub query: String,
}

/// A run of adjacent atoms sharing the same rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run<'a> {
    Text { text: String, marks: &'a Marks },
    Mention(&'a MentionToken),
}

/// Rich-text content of the composer: blocks of atoms plus cursor and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    cursor: Pos,
    anchor: Option<Pos>,
    /// Marks toggled with an empty selection, applied to the next typed text
    stored_marks: Option<Marks>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            blocks: vec![Block::empty(BlockKind::Paragraph)],
            cursor: Pos::default(),
            anchor: None,
            stored_marks: None,
        }
    }

    /// A single paragraph per input line, cursor at the end.
    pub fn from_plain(text: &str) -> Self {
        let mut doc = Document::new();
        doc.insert_text(text);
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    /// Ordered selection bounds, or None when the selection is collapsed.
    pub fn selection(&self) -> Option<(Pos, Pos)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn current_block_kind(&self) -> BlockKind {
        self.blocks[self.cursor.block].kind
    }

    fn clamp(&self, pos: Pos) -> Pos {
        let block = pos.block.min(self.blocks.len() - 1);
        let offset = pos.offset.min(self.blocks[block].atoms.len());
        Pos { block, offset }
    }

    fn end_pos(&self) -> Pos {
        let block = self.blocks.len() - 1;
        Pos::new(block, self.blocks[block].atoms.len())
    }

    pub fn set_cursor(&mut self, pos: Pos) {
        self.cursor = self.clamp(pos);
        self.anchor = None;
        self.stored_marks = None;
    }

    pub fn clear(&mut self) {
        *self = Document::new();
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Pos::default());
        self.cursor = self.end_pos();
        self.stored_marks = None;
    }

    // -----------------------------------------------------------------------
    // Queries

    /// True when there is no mention and no non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.blocks
            .iter()
            .all(|b| b.atoms.iter().all(Atom::is_whitespace))
    }

    pub fn block_text(&self, index: usize) -> String {
        self.blocks
            .get(index)
            .map(|b| atoms_text(&b.atoms))
            .unwrap_or_default()
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| atoms_text(&b.atoms))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn mentions(&self) -> Vec<&MentionToken> {
        self.blocks
            .iter()
            .flat_map(|b| b.atoms.iter())
            .filter_map(|a| match a {
                Atom::Mention(token) => Some(token),
                Atom::Text { .. } => None,
            })
            .collect()
    }

    /// Marks in effect at the cursor (what the toolbar shows as active).
    pub fn active_marks(&self) -> Marks {
        if let Some(marks) = &self.stored_marks {
            return marks.clone();
        }
        match self.atom_before(self.cursor) {
            Some(Atom::Text { marks, .. }) => marks.clone(),
            _ => Marks::default(),
        }
    }

    fn atom_before(&self, pos: Pos) -> Option<&Atom> {
        if pos.offset == 0 {
            return None;
        }
        self.blocks[pos.block].atoms.get(pos.offset - 1)
    }

    /// Marks applied to newly typed text.
    fn insertion_marks(&self) -> Marks {
        if self.current_block_kind() == BlockKind::CodeBlock {
            return Marks::default();
        }
        if let Some(marks) = &self.stored_marks {
            return marks.clone();
        }
        match self.atom_before(self.cursor) {
            Some(Atom::Text { marks, .. }) => Marks {
                link: None,
                ..marks.clone()
            },
            _ => Marks::default(),
        }
    }

    /// The `@query` directly before the cursor, if the cursor sits in one.
    ///
    /// The `@` must start the block or follow whitespace, and the query may
    /// not contain whitespace. Code blocks and code-marked text never trigger.
    pub fn trigger(&self) -> Option<Trigger> {
        if self.selection().is_some() || self.current_block_kind() == BlockKind::CodeBlock {
            return None;
        }
        let atoms = &self.blocks[self.cursor.block].atoms[..self.cursor.offset];
        let mut at = None;
        for idx in (0..atoms.len()).rev() {
            match &atoms[idx] {
                Atom::Text { grapheme, marks } if grapheme == "@" => {
                    if marks.code {
                        return None;
                    }
                    at = Some(idx);
                    break;
                }
                Atom::Text { grapheme, .. } if !grapheme.chars().all(char::is_whitespace) => {
                    continue;
                }
                _ => return None,
            }
        }
        let at = at?;
        if at > 0 && !atoms[at - 1].is_whitespace() {
            return None;
        }
        Some(Trigger {
            start: Pos::new(self.cursor.block, at),
            end: self.cursor,
            query: atoms_text(&atoms[at + 1..]),
        })
    }

    /// Gutter drawn before a block: quote bar, bullet, list number.
    pub fn block_prefix(&self, index: usize) -> String {
        match self.blocks[index].kind {
            BlockKind::Paragraph => String::new(),
            BlockKind::Blockquote => "\u{2502} ".into(),
            BlockKind::BulletItem => "\u{2022} ".into(),
            BlockKind::OrderedItem => format!("{}. ", self.ordinal(index)),
            BlockKind::CodeBlock => "  ".into(),
        }
    }

    /// 1-based number of an ordered item within its run of ordered items.
    fn ordinal(&self, index: usize) -> usize {
        self.blocks[..index]
            .iter()
            .rev()
            .take_while(|b| b.kind == BlockKind::OrderedItem)
            .count()
            + 1
    }

    /// Screen cell of a position relative to the top-left of the editing
    /// area, one row per block: `(column, row)`.
    pub fn cell_of(&self, pos: Pos) -> (u16, u16) {
        let pos = self.clamp(pos);
        let prefix = unicode::display_width(&self.block_prefix(pos.block));
        let text: usize = self.blocks[pos.block].atoms[..pos.offset]
            .iter()
            .map(Atom::display_width)
            .sum();
        (
            u16::try_from(prefix + text).unwrap_or(u16::MAX),
            u16::try_from(pos.block).unwrap_or(u16::MAX),
        )
    }

    // -----------------------------------------------------------------------
    // Editing

    /// Insert text at the cursor, replacing the selection. Newlines split blocks.
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        let marks = self.insertion_marks();
        for grapheme in unicode::graphemes(text) {
            if grapheme == "\n" || grapheme == "\r\n" {
                self.split_block();
                continue;
            }
            if grapheme == "\r" {
                continue;
            }
            let Pos { block, offset } = self.cursor;
            self.blocks[block].atoms.insert(
                offset,
                Atom::Text {
                    grapheme: grapheme.to_string(),
                    marks: marks.clone(),
                },
            );
            self.cursor.offset += 1;
        }
        self.stored_marks = None;
    }

    /// Replace `start..end` (same block) with a mention followed by a space.
    pub fn replace_with_mention(&mut self, start: Pos, end: Pos, token: MentionToken) {
        self.anchor = None;
        self.stored_marks = None;
        let start = self.clamp(start);
        let end = self.clamp(end);
        let at = if start.block == end.block && start.offset <= end.offset {
            self.blocks[start.block]
                .atoms
                .drain(start.offset..end.offset);
            start
        } else {
            self.cursor
        };
        let atoms = &mut self.blocks[at.block].atoms;
        atoms.insert(at.offset, Atom::Mention(token));
        atoms.insert(
            at.offset + 1,
            Atom::Text {
                grapheme: " ".into(),
                marks: Marks::default(),
            },
        );
        self.cursor = Pos::new(at.block, at.offset + 2);
    }

    /// Append plain text at the end of the document.
    pub fn append_text(&mut self, text: &str) {
        self.set_cursor(self.end_pos());
        self.insert_text(text);
    }

    /// Append text carrying explicit marks at the end of the document.
    pub fn append_marked(&mut self, text: &str, marks: Marks) {
        self.set_cursor(self.end_pos());
        self.stored_marks = Some(marks);
        self.insert_text(text);
    }

    /// Append a mention (without trailing space) at the end of the document.
    pub fn append_mention(&mut self, token: MentionToken) {
        let end = self.end_pos();
        self.blocks[end.block].atoms.push(Atom::Mention(token));
        self.set_cursor(self.end_pos());
    }

    /// Remove the selected atoms. Returns false when nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        if start.block == end.block {
            self.blocks[start.block]
                .atoms
                .drain(start.offset..end.offset);
        } else {
            let tail = self.blocks[end.block].atoms.split_off(end.offset);
            self.blocks[start.block].atoms.truncate(start.offset);
            self.blocks[start.block].atoms.extend(tail);
            self.blocks.drain(start.block + 1..=end.block);
        }
        self.cursor = start;
        self.anchor = None;
        true
    }

    pub fn backspace(&mut self) {
        self.stored_marks = None;
        if self.delete_selection() {
            return;
        }
        let Pos { block, offset } = self.cursor;
        if offset > 0 {
            self.blocks[block].atoms.remove(offset - 1);
            self.cursor.offset -= 1;
        } else if self.blocks[block].kind != BlockKind::Paragraph {
            // Lift a list item / quote / code line back to a paragraph first
            self.blocks[block].kind = BlockKind::Paragraph;
        } else if block > 0 {
            let moved = std::mem::take(&mut self.blocks[block].atoms);
            self.blocks.remove(block);
            let prev_len = self.blocks[block - 1].atoms.len();
            self.blocks[block - 1].atoms.extend(moved);
            self.cursor = Pos::new(block - 1, prev_len);
        }
    }

    pub fn delete_forward(&mut self) {
        self.stored_marks = None;
        if self.delete_selection() {
            return;
        }
        let Pos { block, offset } = self.cursor;
        if offset < self.blocks[block].atoms.len() {
            self.blocks[block].atoms.remove(offset);
        } else if block + 1 < self.blocks.len() {
            let next = self.blocks.remove(block + 1);
            self.blocks[block].atoms.extend(next.atoms);
        }
    }

    /// Split the current block at the cursor; the new block keeps the kind.
    /// An empty list item or quote is turned back into a paragraph instead.
    pub fn split_block(&mut self) {
        self.delete_selection();
        let Pos { block, offset } = self.cursor;
        let kind = self.blocks[block].kind;
        if self.blocks[block].atoms.is_empty()
            && matches!(
                kind,
                BlockKind::BulletItem | BlockKind::OrderedItem | BlockKind::Blockquote
            )
        {
            self.blocks[block].kind = BlockKind::Paragraph;
            return;
        }
        let tail = self.blocks[block].atoms.split_off(offset);
        self.blocks.insert(block + 1, Block { kind, atoms: tail });
        self.cursor = Pos::new(block + 1, 0);
    }

    // -----------------------------------------------------------------------
    // Cursor movement

    fn begin_move(&mut self, extend: bool) {
        self.stored_marks = None;
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend && let Some((start, _)) = self.selection() {
            self.anchor = None;
            self.cursor = start;
            return;
        }
        self.begin_move(extend);
        let Pos { block, offset } = self.cursor;
        if offset > 0 {
            self.cursor.offset -= 1;
        } else if block > 0 {
            self.cursor = Pos::new(block - 1, self.blocks[block - 1].atoms.len());
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && let Some((_, end)) = self.selection() {
            self.anchor = None;
            self.cursor = end;
            return;
        }
        self.begin_move(extend);
        let Pos { block, offset } = self.cursor;
        if offset < self.blocks[block].atoms.len() {
            self.cursor.offset += 1;
        } else if block + 1 < self.blocks.len() {
            self.cursor = Pos::new(block + 1, 0);
        }
    }

    pub fn move_up(&mut self, extend: bool) {
        self.begin_move(extend);
        if self.cursor.block == 0 {
            self.cursor.offset = 0;
        } else {
            self.cursor = self.clamp(Pos::new(self.cursor.block - 1, self.cursor.offset));
        }
    }

    pub fn move_down(&mut self, extend: bool) {
        self.begin_move(extend);
        if self.cursor.block + 1 >= self.blocks.len() {
            self.cursor.offset = self.blocks[self.cursor.block].atoms.len();
        } else {
            self.cursor = self.clamp(Pos::new(self.cursor.block + 1, self.cursor.offset));
        }
    }

    pub fn move_home(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor.offset = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor.offset = self.blocks[self.cursor.block].atoms.len();
    }

    // -----------------------------------------------------------------------
    // Formatting commands

    /// Toggle a mark over the selection, or flip the stored marks when the
    /// selection is empty.
    pub fn toggle_mark(&mut self, mark: Mark) {
        let Some((start, end)) = self.selection() else {
            let mut marks = self.insertion_marks();
            let on = !marks.has(mark);
            marks.set(mark, on);
            self.stored_marks = Some(marks);
            return;
        };
        let mut all = true;
        let mut any = false;
        self.for_each_text_in(start, end, |marks| {
            any = true;
            all &= marks.has(mark);
        });
        let on = !(any && all);
        self.for_each_text_in(start, end, |marks| marks.set(mark, on));
    }

    /// Set a block kind on every block the selection touches, or revert them
    /// to paragraphs when they all have it already.
    pub fn toggle_block(&mut self, kind: BlockKind) {
        let (first, last) = match self.selection() {
            Some((start, end)) => (start.block, end.block),
            None => (self.cursor.block, self.cursor.block),
        };
        let all = self.blocks[first..=last].iter().all(|b| b.kind == kind);
        let target = if all { BlockKind::Paragraph } else { kind };
        for block in &mut self.blocks[first..=last] {
            block.kind = target;
            if target == BlockKind::CodeBlock {
                for atom in &mut block.atoms {
                    if let Atom::Text { marks, .. } = atom {
                        *marks = Marks::default();
                    }
                }
            }
        }
    }

    /// Link the selection to `url`; with no selection the URL is inserted as
    /// linked text. Returns false (and changes nothing) for a blank URL.
    pub fn set_link(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        match self.selection() {
            Some((start, end)) => {
                self.for_each_text_in(start, end, |marks| marks.link = Some(url.to_string()));
            }
            None => {
                let mut marks = self.insertion_marks();
                marks.link = Some(url.to_string());
                self.stored_marks = Some(marks);
                self.insert_text(url);
            }
        }
        true
    }

    /// Mark bare http(s) URLs as links (outside code).
    pub fn autolink(&mut self) {
        for block in &mut self.blocks {
            if block.kind == BlockKind::CodeBlock {
                continue;
            }
            let mut i = 0;
            while i < block.atoms.len() {
                // Collect a run of text atoms
                let run_start = i;
                let mut text = String::new();
                let mut starts = Vec::new();
                while let Some(Atom::Text { grapheme, .. }) = block.atoms.get(i) {
                    starts.push(text.len());
                    text.push_str(grapheme);
                    i += 1;
                }
                for m in URL_RE.find_iter(&text) {
                    let url = m
                        .as_str()
                        .trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
                    let url_end = m.start() + url.len();
                    for (k, byte) in starts.iter().enumerate() {
                        if *byte < m.start() || *byte >= url_end {
                            continue;
                        }
                        if let Atom::Text { marks, .. } = &mut block.atoms[run_start + k]
                            && marks.link.is_none()
                            && !marks.code
                        {
                            marks.link = Some(url.to_string());
                        }
                    }
                }
                // Skip the mention that ended the run
                if i == run_start {
                    i += 1;
                }
            }
        }
    }

    fn for_each_text_in(&mut self, start: Pos, end: Pos, mut f: impl FnMut(&mut Marks)) {
        for b in start.block..=end.block {
            let kind = self.blocks[b].kind;
            let atoms = &mut self.blocks[b].atoms;
            let from = if b == start.block { start.offset } else { 0 };
            let to = if b == end.block { end.offset } else { atoms.len() };
            if kind == BlockKind::CodeBlock {
                continue;
            }
            for atom in &mut atoms[from..to] {
                if let Atom::Text { marks, .. } = atom {
                    f(marks);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Serialization

    /// Markup in the shape the web editor produced (`<p>`, `<ul><li><p>`, ...).
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < self.blocks.len() {
            let kind = self.blocks[i].kind;
            let mut j = i;
            while j < self.blocks.len() && self.blocks[j].kind == kind {
                j += 1;
            }
            let group = &self.blocks[i..j];
            match kind {
                BlockKind::Paragraph => {
                    for block in group {
                        out.push_str(&format!("<p>{}</p>", inline_html(&block.atoms)));
                    }
                }
                BlockKind::Blockquote => {
                    out.push_str("<blockquote>");
                    for block in group {
                        out.push_str(&format!("<p>{}</p>", inline_html(&block.atoms)));
                    }
                    out.push_str("</blockquote>");
                }
                BlockKind::BulletItem | BlockKind::OrderedItem => {
                    let tag = if kind == BlockKind::BulletItem { "ul" } else { "ol" };
                    out.push_str(&format!("<{}>", tag));
                    for block in group {
                        out.push_str(&format!("<li><p>{}</p></li>", inline_html(&block.atoms)));
                    }
                    out.push_str(&format!("</{}>", tag));
                }
                BlockKind::CodeBlock => {
                    let code = group
                        .iter()
                        .map(|b| escape_html(&atoms_text(&b.atoms)))
                        .collect::<Vec<_>>()
                        .join("\n");
                    out.push_str(&format!("<pre><code>{}</code></pre>", code));
                }
            }
            i = j;
        }
        out
    }

    /// Markdown rendering used by the CLI. Blocks are separated by a blank
    /// line; list items, quote lines and code lines stay grouped.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<BlockKind> = None;
        for (index, block) in self.blocks.iter().enumerate() {
            let kind = block.kind;
            match prev {
                Some(p) if p == kind && kind != BlockKind::Paragraph => {
                    out.push('\n');
                    if kind == BlockKind::Blockquote {
                        out.push_str(">\n");
                    }
                }
                Some(p) => {
                    if p == BlockKind::CodeBlock {
                        out.push_str("\n```");
                    }
                    out.push_str("\n\n");
                }
                None => {}
            }
            if kind == BlockKind::CodeBlock && prev != Some(BlockKind::CodeBlock) {
                out.push_str("```\n");
            }
            let line = match kind {
                BlockKind::CodeBlock => atoms_text(&block.atoms),
                BlockKind::Paragraph => inline_markdown(&block.atoms),
                BlockKind::Blockquote => format!("> {}", inline_markdown(&block.atoms)),
                BlockKind::BulletItem => format!("- {}", inline_markdown(&block.atoms)),
                BlockKind::OrderedItem => {
                    format!("{}. {}", self.ordinal(index), inline_markdown(&block.atoms))
                }
            };
            out.push_str(&line);
            prev = Some(kind);
        }
        if prev == Some(BlockKind::CodeBlock) {
            out.push_str("\n```");
        }
        out
    }
}

/// Group atoms into runs of identically marked text and mentions.
pub fn runs(atoms: &[Atom]) -> Vec<Run<'_>> {
    let mut out: Vec<Run> = Vec::new();
    for atom in atoms {
        match atom {
            Atom::Text { grapheme, marks } => {
                if let Some(Run::Text { text, marks: last }) = out.last_mut()
                    && *last == marks
                {
                    text.push_str(grapheme);
                    continue;
                }
                out.push(Run::Text {
                    text: grapheme.clone(),
                    marks,
                });
            }
            Atom::Mention(token) => out.push(Run::Mention(token)),
        }
    }
    out
}

fn atoms_text(atoms: &[Atom]) -> String {
    atoms
        .iter()
        .map(|a| match a {
            Atom::Text { grapheme, .. } => grapheme.clone(),
            Atom::Mention(token) => token.display(),
        })
        .collect()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline_html(atoms: &[Atom]) -> String {
    let mut out = String::new();
    for run in runs(atoms) {
        match run {
            Run::Mention(token) => out.push_str(&format!(
                r#"<span data-type="mention" data-id="{}" data-label="{}">@{}</span>"#,
                escape_html(&token.id),
                escape_html(&token.label),
                escape_html(&token.label)
            )),
            Run::Text { text, marks } => {
                let mut close = Vec::new();
                if let Some(href) = &marks.link {
                    out.push_str(&format!(r#"<a href="{}">"#, escape_html(href)));
                    close.push("</a>");
                }
                for (on, open, end) in [
                    (marks.bold, "<strong>", "</strong>"),
                    (marks.italic, "<em>", "</em>"),
                    (marks.underline, "<u>", "</u>"),
                    (marks.strike, "<s>", "</s>"),
                    (marks.code, "<code>", "</code>"),
                ] {
                    if on {
                        out.push_str(open);
                        close.push(end);
                    }
                }
                out.push_str(&escape_html(&text));
                for tag in close.iter().rev() {
                    out.push_str(tag);
                }
            }
        }
    }
    out
}

fn inline_markdown(atoms: &[Atom]) -> String {
    let mut out = String::new();
    for run in runs(atoms) {
        match run {
            Run::Mention(token) => out.push_str(&token.display()),
            Run::Text { text, marks } => {
                let mut s = text;
                if marks.code {
                    s = format!("`{}`", s);
                }
                if marks.strike {
                    s = format!("~~{}~~", s);
                }
                if marks.underline {
                    s = format!("<u>{}</u>", s);
                }
                if marks.italic {
                    s = format!("*{}*", s);
                }
                if marks.bold {
                    s = format!("**{}**", s);
                }
                if let Some(href) = &marks.link {
                    s = if s == *href {
                        format!("<{}>", href)
                    } else {
                        format!("[{}]({})", s, href)
                    };
                }
                out.push_str(&s);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn mention(name: &str) -> MentionToken {
        MentionToken {
            id: name.into(),
            label: name.into(),
        }
    }

    fn select(doc: &mut Document, from: Pos, to: Pos) {
        doc.set_cursor(from);
        doc.anchor = Some(from);
        doc.cursor = to;
    }

    #[test]
    fn new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.to_html(), "<p></p>");
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        assert!(Document::from_plain("  \n ").is_empty());
        assert!(!Document::from_plain(" x ").is_empty());
    }

    #[test]
    fn mention_alone_is_not_empty() {
        let mut doc = Document::new();
        doc.append_mention(mention("Aldyyy"));
        assert!(!doc.is_empty());
    }

    #[test]
    fn typing_advances_cursor_by_grapheme() {
        let mut doc = Document::new();
        doc.insert_text("e\u{0301}h");
        assert_eq!(doc.cursor(), Pos::new(0, 2));
        assert_eq!(doc.plain_text(), "e\u{0301}h");
    }

    #[test]
    fn newline_splits_blocks() {
        let doc = Document::from_plain("one\ntwo");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.block_text(1), "two");
        assert_eq!(doc.cursor(), Pos::new(1, 3));
    }

    #[test]
    fn mention_is_one_cursor_unit() {
        let mut doc = Document::from_plain("hi @Ra");
        let trigger = doc.trigger().unwrap();
        doc.replace_with_mention(trigger.start, trigger.end, mention("Rahmadini"));
        assert_eq!(doc.plain_text(), "hi @Rahmadini ");
        // cursor sits after mention + trailing space
        assert_eq!(doc.cursor(), Pos::new(0, 5));

        doc.backspace(); // the space
        doc.backspace(); // the whole mention
        assert_eq!(doc.plain_text(), "hi ");
        assert!(doc.mentions().is_empty());
    }

    #[test]
    fn moving_over_a_mention_takes_one_step() {
        let mut doc = Document::new();
        doc.append_text("a");
        doc.append_mention(mention("Dea Ananda"));
        doc.append_text("b");
        doc.set_cursor(Pos::new(0, 3));
        doc.move_left(false);
        doc.move_left(false);
        assert_eq!(doc.cursor(), Pos::new(0, 1));
    }

    #[test]
    fn trigger_requires_start_or_whitespace_before_at() {
        assert_eq!(
            Document::from_plain("@al").trigger().map(|t| t.query),
            Some("al".into())
        );
        assert_eq!(
            Document::from_plain("ping @").trigger().map(|t| t.query),
            Some(String::new())
        );
        assert!(Document::from_plain("mail@al").trigger().is_none());
        assert!(Document::from_plain("@al x").trigger().is_none());
    }

    #[test]
    fn trigger_is_off_in_code_blocks() {
        let mut doc = Document::new();
        doc.toggle_block(BlockKind::CodeBlock);
        doc.insert_text("@al");
        assert!(doc.trigger().is_none());
    }

    #[test]
    fn trigger_geometry_counts_prefix_and_wide_chars() {
        let mut doc = Document::new();
        doc.toggle_block(BlockKind::BulletItem);
        doc.insert_text("🎉 @a");
        let trigger = doc.trigger().unwrap();
        // "• " (2) + "🎉" (2) + " " (1)
        assert_eq!(doc.cell_of(trigger.start), (5, 0));
    }

    #[test]
    fn toggle_mark_over_selection() {
        let mut doc = Document::from_plain("hello world");
        select(&mut doc, Pos::new(0, 6), Pos::new(0, 11));
        doc.toggle_mark(Mark::Bold);
        assert_snapshot!(doc.to_html(), @"<p>hello <strong>world</strong></p>");
        doc.toggle_mark(Mark::Bold);
        assert_eq!(doc.to_html(), "<p>hello world</p>");
    }

    #[test]
    fn mixed_selection_turns_mark_on() {
        let mut doc = Document::from_plain("ab");
        select(&mut doc, Pos::new(0, 0), Pos::new(0, 1));
        doc.toggle_mark(Mark::Strike);
        select(&mut doc, Pos::new(0, 0), Pos::new(0, 2));
        doc.toggle_mark(Mark::Strike);
        assert_eq!(doc.to_html(), "<p><s>ab</s></p>");
    }

    #[test]
    fn stored_marks_apply_to_next_typed_text() {
        let mut doc = Document::from_plain("run ");
        doc.toggle_mark(Mark::Code);
        doc.insert_text("cargo");
        doc.toggle_mark(Mark::Code);
        doc.insert_text(" now");
        assert_snapshot!(doc.to_html(), @"<p>run <code>cargo</code> now</p>");
    }

    #[test]
    fn typed_text_inherits_marks_but_not_links() {
        let mut doc = Document::new();
        doc.set_link("https://example.com");
        doc.insert_text("!");
        assert_eq!(
            doc.to_html(),
            r#"<p><a href="https://example.com">https://example.com</a>!</p>"#
        );
    }

    #[test]
    fn set_link_wraps_selection() {
        let mut doc = Document::from_plain("see docs");
        select(&mut doc, Pos::new(0, 4), Pos::new(0, 8));
        assert!(doc.set_link(" https://docs.rs "));
        assert_snapshot!(doc.to_markdown(), @"see [docs](https://docs.rs)");
    }

    #[test]
    fn blank_link_is_a_no_op() {
        let mut doc = Document::from_plain("text");
        let before = doc.clone();
        assert!(!doc.set_link("   "));
        assert_eq!(doc, before);
    }

    #[test]
    fn toggle_block_round_trip() {
        let mut doc = Document::from_plain("item");
        doc.toggle_block(BlockKind::BulletItem);
        assert_eq!(doc.to_html(), "<ul><li><p>item</p></li></ul>");
        doc.toggle_block(BlockKind::BulletItem);
        assert_eq!(doc.to_html(), "<p>item</p>");
    }

    #[test]
    fn toggle_block_covers_selected_blocks() {
        let mut doc = Document::from_plain("one\ntwo\nthree");
        select(&mut doc, Pos::new(0, 1), Pos::new(1, 1));
        doc.toggle_block(BlockKind::OrderedItem);
        assert_snapshot!(doc.to_markdown(), @r"
        1. one
        2. two

        three
        ");
    }

    #[test]
    fn code_block_strips_marks_and_escapes() {
        let mut doc = Document::new();
        doc.append_marked("<b>", Marks { bold: true, ..Marks::default() });
        doc.toggle_block(BlockKind::CodeBlock);
        assert_eq!(doc.to_html(), "<pre><code>&lt;b&gt;</code></pre>");
    }

    #[test]
    fn split_in_list_continues_list_and_empty_item_exits() {
        let mut doc = Document::from_plain("a");
        doc.toggle_block(BlockKind::BulletItem);
        doc.split_block();
        assert_eq!(doc.current_block_kind(), BlockKind::BulletItem);
        doc.split_block();
        assert_eq!(doc.current_block_kind(), BlockKind::Paragraph);
        assert_eq!(doc.blocks().len(), 2);
    }

    #[test]
    fn backspace_lifts_then_merges() {
        let mut doc = Document::from_plain("a\nb");
        doc.set_cursor(Pos::new(1, 0));
        doc.toggle_block(BlockKind::Blockquote);
        doc.backspace();
        assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);
        doc.backspace();
        assert_eq!(doc.plain_text(), "ab");
        assert_eq!(doc.cursor(), Pos::new(0, 1));
    }

    #[test]
    fn delete_selection_across_blocks() {
        let mut doc = Document::from_plain("hello\nbig\nworld");
        select(&mut doc, Pos::new(0, 2), Pos::new(2, 3));
        doc.insert_text("y");
        assert_eq!(doc.plain_text(), "heyld");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn select_all_then_type_replaces_everything() {
        let mut doc = Document::from_plain("one\ntwo");
        doc.select_all();
        doc.insert_text("x");
        assert_eq!(doc.plain_text(), "x");
    }

    #[test]
    fn shift_movement_extends_selection_and_plain_move_collapses() {
        let mut doc = Document::from_plain("abc");
        doc.move_left(true);
        doc.move_left(true);
        assert_eq!(doc.selection(), Some((Pos::new(0, 1), Pos::new(0, 3))));
        doc.move_left(false);
        assert_eq!(doc.cursor(), Pos::new(0, 1));
        assert!(doc.selection().is_none());
    }

    #[test]
    fn autolink_marks_bare_urls_without_trailing_punctuation() {
        let mut doc = Document::from_plain("see https://example.com/a, thanks");
        doc.autolink();
        assert_snapshot!(
            doc.to_html(),
            @r#"<p>see <a href="https://example.com/a">https://example.com/a</a>, thanks</p>"#
        );
    }

    #[test]
    fn html_for_mentions_and_quotes() {
        let mut doc = Document::new();
        doc.append_text("cc ");
        doc.append_mention(mention("Dea Ananda"));
        doc.toggle_block(BlockKind::Blockquote);
        assert_snapshot!(
            doc.to_html(),
            @r#"<blockquote><p>cc <span data-type="mention" data-id="Dea Ananda" data-label="Dea Ananda">@Dea Ananda</span></p></blockquote>"#
        );
    }

    #[test]
    fn markdown_fences_code_runs() {
        let mut doc = Document::from_plain("intro\nlet x = 1;\nlet y = 2;");
        select(&mut doc, Pos::new(1, 0), Pos::new(2, 0));
        doc.toggle_block(BlockKind::CodeBlock);
        assert_eq!(doc.to_markdown(), "intro\n\n```\nlet x = 1;\nlet y = 2;\n```");
    }

    #[test]
    fn markdown_keeps_paragraph_and_quote_splits() {
        let doc = Document::from_plain("first\nsecond");
        assert_eq!(doc.to_markdown(), "first\n\nsecond");

        let mut quoted = Document::from_plain("a\nb\nafter");
        select(&mut quoted, Pos::new(0, 0), Pos::new(1, 1));
        quoted.toggle_block(BlockKind::Blockquote);
        assert_eq!(quoted.to_markdown(), "> a\n>\n> b\n\nafter");
    }
}
