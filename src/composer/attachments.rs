use crate::model::attachment::{Attachment, AttachmentId, Preview};

/// Files attached to the message being composed.
///
/// Ids are never reused, even across `clear`, so a preview that finishes
/// after its file was removed or sent cannot land on a newer file.
#[derive(Debug, Clone, Default)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
    next_id: u64,
}

impl PendingAttachments {
    pub fn new() -> Self {
        PendingAttachments::default()
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: AttachmentId) -> Option<&Attachment> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Record a file and return its assigned record.
    pub fn add(&mut self, name: &str, size: u64, mime: &str) -> &Attachment {
        self.next_id += 1;
        self.items.push(Attachment {
            id: AttachmentId(self.next_id),
            name: name.to_string(),
            size,
            mime: mime.to_string(),
            preview: None,
        });
        tracing::debug!(id = %AttachmentId(self.next_id), name, "attachment added");
        &self.items[self.items.len() - 1]
    }

    pub fn remove(&mut self, id: AttachmentId) -> Option<Attachment> {
        let idx = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn remove_last(&mut self) -> Option<Attachment> {
        self.items.pop()
    }

    /// Attach a finished preview. Returns false when the file is gone.
    pub fn apply_preview(&mut self, id: AttachmentId, preview: Preview) -> bool {
        match self.items.iter_mut().find(|a| a.id == id) {
            Some(item) => {
                item.preview = Some(preview);
                true
            }
            None => {
                tracing::debug!(%id, "discarding preview for removed attachment");
                false
            }
        }
    }

    /// Copy of the current list, as stored on a sent comment.
    pub fn snapshot(&self) -> Vec<Attachment> {
        self.items.clone()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
