use chrono::{DateTime, Local};

use super::attachment::Attachment;
use super::document::Document;

/// One message in a task's comment thread
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<Local>,
    pub body: Document,
    pub attachments: Vec<Attachment>,
}

impl Comment {
    pub fn has_text(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Ordered message log of a task
#[derive(Debug, Clone, Default)]
pub struct Thread {
    comments: Vec<Comment>,
    next_id: u64,
    /// Comments after this index are drawn under a "New Messages" divider
    read_up_to: Option<usize>,
}

impl Thread {
    pub fn new() -> Self {
        Thread::default()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Append a message and return it.
    pub fn push(
        &mut self,
        author: &str,
        timestamp: DateTime<Local>,
        body: Document,
        attachments: Vec<Attachment>,
    ) -> &Comment {
        self.next_id += 1;
        self.comments.push(Comment {
            id: format!("c{}", self.next_id),
            author: author.to_string(),
            timestamp,
            body,
            attachments,
        });
        &self.comments[self.comments.len() - 1]
    }

    pub fn mark_read_up_to(&mut self, index: usize) {
        self.read_up_to = Some(index);
    }

    /// Index of the first unread comment, if there is one.
    pub fn first_unread(&self) -> Option<usize> {
        let first = self.read_up_to? + 1;
        (first < self.comments.len()).then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequential_ids() {
        let mut thread = Thread::new();
        let now = Local::now();
        let id1 = thread.push("A", now, Document::from_plain("one"), vec![]).id.clone();
        let id2 = thread.push("B", now, Document::from_plain("two"), vec![]).id.clone();
        assert_eq!((id1.as_str(), id2.as_str()), ("c1", "c2"));
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn divider_sits_after_read_marker() {
        let mut thread = Thread::new();
        let now = Local::now();
        for text in ["a", "b", "c"] {
            thread.push("A", now, Document::from_plain(text), vec![]);
        }
        assert_eq!(thread.first_unread(), None);
        thread.mark_read_up_to(1);
        assert_eq!(thread.first_unread(), Some(2));
        thread.mark_read_up_to(2);
        assert_eq!(thread.first_unread(), None);
    }

    #[test]
    fn attachment_only_comment_has_no_text() {
        let mut thread = Thread::new();
        let comment = thread.push("A", Local::now(), Document::new(), vec![]);
        assert!(!comment.has_text());
    }
}
