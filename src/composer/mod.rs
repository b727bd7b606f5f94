pub mod attachments;
pub mod emoji;
pub mod keymap;
pub mod suggestion;

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::attachment::AttachmentId;
use crate::model::comment::{Comment, Thread};
use crate::model::document::{Atom, BlockKind, Document, Mark, Pos, Trigger};
use crate::model::member::MemberDirectory;

use attachments::PendingAttachments;
use emoji::EmojiPicker;
use keymap::{Command, KeyRouter, Route, SuggestionKey};
use suggestion::{AnchorRect, SuggestionController, TriggerContext, TriggerRange};

/// What the composer did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Taken by the router, a popup, or a formatting command
    Consumed,
    /// Applied by the text editor
    Edited,
    /// Enter without modifiers: the caller should run [`Composer::submit`]
    Submit,
    /// The link chord: the caller should ask for a URL and call
    /// [`Composer::apply_link`]
    PromptLink,
    /// Nobody wanted it
    Ignored,
}

impl Outcome {
    pub fn is_consumed(self) -> bool {
        self != Outcome::Ignored
    }
}

/// The comment input: document, mention suggestions, key routing, emoji
/// picker and pending attachments, owned together.
#[derive(Debug, Clone)]
pub struct Composer {
    author: String,
    document: Document,
    suggestions: SuggestionController,
    router: KeyRouter,
    emoji: EmojiPicker,
    attachments: PendingAttachments,
    show_toolbar: bool,
    /// Start of a trigger closed with Esc; it stays closed until a new `@`
    dismissed: Option<Pos>,
}

impl Composer {
    pub fn new(author: impl Into<String>, directory: Arc<MemberDirectory>) -> Self {
        Composer {
            author: author.into(),
            document: Document::new(),
            suggestions: SuggestionController::new(directory),
            router: KeyRouter::default(),
            emoji: EmojiPicker::default(),
            attachments: PendingAttachments::new(),
            show_toolbar: true,
            dismissed: None,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn suggestions(&self) -> &SuggestionController {
        &self.suggestions
    }

    pub fn emoji(&self) -> &EmojiPicker {
        &self.emoji
    }

    pub fn attachments(&self) -> &PendingAttachments {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut PendingAttachments {
        &mut self.attachments
    }

    pub fn show_toolbar(&self) -> bool {
        self.show_toolbar
    }

    pub fn set_show_toolbar(&mut self, show: bool) {
        self.show_toolbar = show;
    }

    pub fn toggle_toolbar(&mut self) {
        self.show_toolbar = !self.show_toolbar;
    }

    /// Something to send: text or at least one file.
    pub fn can_submit(&self) -> bool {
        !self.document.is_empty() || !self.attachments.is_empty()
    }

    // -----------------------------------------------------------------------
    // Keys

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if self.emoji.is_open()
            && let Some(outcome) = self.handle_emoji_key(key)
        {
            return outcome;
        }

        match self.router.route(key, self.suggestions.is_open()) {
            Route::Suggestion(SuggestionKey::Move(direction)) => {
                if self.suggestions.move_selection(direction) {
                    Outcome::Consumed
                } else {
                    // Nothing to highlight: the arrow moves the caret instead
                    self.edit_passthrough(key)
                }
            }
            Route::Suggestion(SuggestionKey::Commit) => {
                if self.suggestions.commit_selected(&mut self.document).is_some() {
                    self.sync_trigger();
                }
                Outcome::Consumed
            }
            Route::Suggestion(SuggestionKey::Dismiss) => {
                self.dismiss_suggestions();
                Outcome::Consumed
            }
            Route::Submit => Outcome::Submit,
            Route::Command(command) => self.run_command(command),
            Route::PassThrough => self.edit_passthrough(key),
        }
    }

    fn edit_passthrough(&mut self, key: KeyEvent) -> Outcome {
        if self.edit_key(key) {
            self.sync_trigger();
            Outcome::Edited
        } else {
            Outcome::Ignored
        }
    }

    fn handle_emoji_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        match key.code {
            KeyCode::Left => self.emoji.move_horizontal(false),
            KeyCode::Right => self.emoji.move_horizontal(true),
            KeyCode::Up => self.emoji.move_vertical(false),
            KeyCode::Down => self.emoji.move_vertical(true),
            KeyCode::Enter => {
                if let Some(emoji) = self.emoji.choose() {
                    self.document.insert_text(emoji);
                    self.sync_trigger();
                }
            }
            KeyCode::Esc => self.emoji.close(),
            _ => return None,
        }
        Some(Outcome::Consumed)
    }

    fn run_command(&mut self, command: Command) -> Outcome {
        tracing::debug!(command = command.label(), "format command");
        match command {
            Command::ToggleStrike => self.document.toggle_mark(Mark::Strike),
            Command::ToggleCodeBlock => self.document.toggle_block(BlockKind::CodeBlock),
            Command::ToggleCode => self.document.toggle_mark(Mark::Code),
            Command::InsertLink => return Outcome::PromptLink,
            Command::ToggleBlockquote => self.document.toggle_block(BlockKind::Blockquote),
            Command::ToggleBulletList => self.document.toggle_block(BlockKind::BulletItem),
            Command::ToggleOrderedList => self.document.toggle_block(BlockKind::OrderedItem),
            Command::OpenMention => {
                self.open_mention();
                return Outcome::Consumed;
            }
        }
        self.sync_trigger();
        Outcome::Consumed
    }

    /// Keys the rich-text field handles itself. Returns false when the key
    /// means nothing to it.
    fn edit_key(&mut self, key: KeyEvent) -> bool {
        let mods = key.modifiers;
        let shift = mods.contains(KeyModifiers::SHIFT);
        let ctrl = mods.contains(KeyModifiers::CONTROL);
        let alt = mods.contains(KeyModifiers::ALT);
        let doc = &mut self.document;
        match key.code {
            KeyCode::Char(c) if ctrl && !alt => match c.to_ascii_lowercase() {
                'b' => doc.toggle_mark(Mark::Bold),
                'i' => doc.toggle_mark(Mark::Italic),
                'u' => doc.toggle_mark(Mark::Underline),
                'a' => doc.move_home(false),
                'e' => doc.move_end(false),
                _ => return false,
            },
            KeyCode::Char(_) if alt || mods.contains(KeyModifiers::SUPER) => return false,
            KeyCode::Char(c) => {
                let mut buf = [0u8; 4];
                doc.insert_text(c.encode_utf8(&mut buf));
            }
            KeyCode::Enter if shift => doc.split_block(),
            KeyCode::Backspace => doc.backspace(),
            KeyCode::Delete => doc.delete_forward(),
            KeyCode::Left => doc.move_left(shift),
            KeyCode::Right => doc.move_right(shift),
            KeyCode::Up => doc.move_up(shift),
            KeyCode::Down => doc.move_down(shift),
            KeyCode::Home => doc.move_home(shift),
            KeyCode::End => doc.move_end(shift),
            _ => return false,
        }
        true
    }

    /// Insert pasted text at the cursor.
    pub fn paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.document.insert_text(text);
        self.sync_trigger();
    }

    // -----------------------------------------------------------------------
    // Mentions

    /// Insert an `@` at the cursor and start a session for it.
    pub fn open_mention(&mut self) {
        let cursor = self.document.cursor();
        let needs_space = cursor.offset > 0
            && match self.document.blocks()[cursor.block].atoms.get(cursor.offset - 1) {
                Some(Atom::Text { grapheme, .. }) => !grapheme.chars().all(char::is_whitespace),
                _ => true,
            };
        if needs_space {
            self.document.insert_text(" ");
        }
        self.document.insert_text("@");
        self.sync_trigger();
    }

    fn dismiss_suggestions(&mut self) {
        if let Some(session) = self.suggestions.session() {
            self.dismissed = Some(session.range.start);
        }
        self.suggestions.close();
    }

    /// Open, refresh or close the suggestion session to match the `@query`
    /// at the cursor.
    fn sync_trigger(&mut self) {
        let Some(trigger) = self.document.trigger() else {
            self.dismissed = None;
            self.suggestions.close();
            return;
        };
        if self.dismissed == Some(trigger.start) {
            return;
        }
        self.dismissed = None;
        let ctx = self.trigger_context(&trigger);
        match self.suggestions.session() {
            Some(session) if session.range.start == trigger.start => {
                self.suggestions.update_query(ctx);
            }
            _ => {
                self.emoji.close();
                self.suggestions.open(ctx);
            }
        }
    }

    fn trigger_context(&self, trigger: &Trigger) -> TriggerContext {
        let (x, y) = self.document.cell_of(trigger.start);
        let (end_x, _) = self.document.cell_of(trigger.end);
        TriggerContext {
            range: TriggerRange {
                start: trigger.start,
                end: trigger.end,
            },
            query: trigger.query.clone(),
            rect: AnchorRect {
                x,
                y,
                width: end_x.saturating_sub(x),
                height: 1,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Popups, links, focus

    pub fn toggle_emoji(&mut self) {
        if !self.emoji.is_open() {
            self.dismiss_suggestions();
        }
        self.emoji.toggle();
    }

    /// Finish the link prompt. A blank URL changes nothing.
    pub fn apply_link(&mut self, url: &str) -> bool {
        let applied = self.document.set_link(url);
        if applied {
            self.sync_trigger();
        }
        applied
    }

    /// The field lost focus: popups go away.
    pub fn blur(&mut self) {
        self.suggestions.close();
        self.emoji.close();
    }

    pub fn remove_attachment(&mut self, id: AttachmentId) -> bool {
        self.attachments.remove(id).is_some()
    }

    // -----------------------------------------------------------------------
    // Submission

    /// Append the message to `thread` and reset the composer. Does nothing
    /// when there is neither text nor a file.
    pub fn submit<'t>(
        &mut self,
        thread: &'t mut Thread,
        now: DateTime<Local>,
    ) -> Option<&'t Comment> {
        if !self.can_submit() {
            return None;
        }
        let mut body = std::mem::take(&mut self.document);
        body.autolink();
        let attachments = self.attachments.snapshot();
        self.attachments.clear();
        self.suggestions.close();
        self.emoji.close();
        self.dismissed = None;
        let comment = thread.push(&self.author, now, body, attachments);
        tracing::info!(
            id = %comment.id,
            author = %comment.author,
            attachments = comment.attachments.len(),
            "comment submitted"
        );
        Some(comment)
    }
}
