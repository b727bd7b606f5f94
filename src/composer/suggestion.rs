use std::sync::Arc;

use crate::model::document::{Document, MentionToken, Pos};
use crate::model::member::{Member, MemberDirectory};

/// Box around the `@query` being typed, in cells relative to the editing area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl AnchorRect {
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// Document range a committed mention replaces (the `@` plus the query)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRange {
    pub start: Pos,
    pub end: Pos,
}

/// What the edit surface reports when a trigger is typed or edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    pub range: TriggerRange,
    pub query: String,
    pub rect: AnchorRect,
}

/// The edit surface a session commits into.
pub trait MentionSink {
    fn insert_mention(&mut self, range: TriggerRange, member: &Member);
}

impl MentionSink for Document {
    fn insert_mention(&mut self, range: TriggerRange, member: &Member) {
        self.replace_with_mention(
            range.start,
            range.end,
            MentionToken {
                id: member.id().to_string(),
                label: member.name.clone(),
            },
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// State of one open autocomplete session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub query: String,
    pub candidates: Vec<Member>,
    /// Always within `0..candidates.len()` when there are candidates
    pub selected: usize,
    pub anchor: AnchorRect,
    pub range: TriggerRange,
}

/// Lifecycle of "@mention" autocomplete: open, filter, navigate, commit, close.
#[derive(Debug, Clone)]
pub struct SuggestionController {
    directory: Arc<MemberDirectory>,
    session: Option<Session>,
}

impl SuggestionController {
    pub fn new(directory: Arc<MemberDirectory>) -> Self {
        SuggestionController {
            directory,
            session: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn candidates(&self) -> &[Member] {
        self.session
            .as_ref()
            .map(|s| s.candidates.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&Member> {
        let session = self.session.as_ref()?;
        session.candidates.get(session.selected)
    }

    /// Start a session for a freshly typed trigger. Re-opening for the trigger
    /// that is already open only refreshes it.
    pub fn open(&mut self, ctx: TriggerContext) {
        if let Some(session) = &self.session
            && session.range.start == ctx.range.start
        {
            self.update_query(ctx);
            return;
        }
        let candidates = self.directory.filter(&ctx.query);
        tracing::debug!(query = %ctx.query, candidates = candidates.len(), "mention session opened");
        self.session = Some(Session {
            query: ctx.query,
            candidates,
            selected: 0,
            anchor: ctx.rect,
            range: ctx.range,
        });
    }

    /// Re-filter for a changed query and move the anchor. A selection that
    /// falls outside the shrunk list resets to the first candidate.
    pub fn update_query(&mut self, ctx: TriggerContext) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.candidates = self.directory.filter(&ctx.query);
        if session.selected >= session.candidates.len() {
            session.selected = 0;
        }
        session.query = ctx.query;
        session.anchor = ctx.rect;
        session.range = ctx.range;
    }

    /// Move the highlight, wrapping at both ends. Returns false when there is
    /// nothing to move over.
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };
        let count = session.candidates.len();
        if count == 0 {
            return false;
        }
        session.selected = match direction {
            Direction::Previous => (session.selected + count - 1) % count,
            Direction::Next => (session.selected + 1) % count,
        };
        true
    }

    /// Insert the highlighted member into `sink` and close the session.
    /// Does nothing when there are no candidates.
    pub fn commit_selected(&mut self, sink: &mut dyn MentionSink) -> Option<Member> {
        let session = self.session.as_ref()?;
        let member = session.candidates.get(session.selected)?.clone();
        let range = session.range;
        sink.insert_mention(range, &member);
        tracing::debug!(member = %member.name, "mention committed");
        self.session = None;
        Some(member)
    }

    pub fn close(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("mention session closed");
        }
    }
}
