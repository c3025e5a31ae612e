//! Staged attachments keyed by file path.
//!
//! DESIGN
//! ======
//! The set is an ordered `Vec` because display order is insertion order and
//! the UI removes entries by position. Path identity is enforced on insert:
//! re-adding a known path rewrites that entry in place. Sending a request only
//! copies the set; entries stay staged until the user removes them.

use crate::model::Attachment;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
}

impl AttachmentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from stored entries, collapsing duplicate paths.
    ///
    /// A later duplicate overwrites the earlier entry, the same outcome as
    /// replaying the entries through [`AttachmentSet::add`].
    #[must_use]
    pub fn from_vec(items: Vec<Attachment>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.add(item.content, item.file_name, item.file_path);
        }
        set
    }

    /// Stage a file, or refresh the entry that already has `file_path`.
    pub fn add(
        &mut self,
        content: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> &[Attachment] {
        let file_path = file_path.into();
        if let Some(existing) = self.items.iter_mut().find(|a| a.file_path == file_path) {
            existing.content = content.into();
            existing.file_name = file_name.into();
        } else {
            self.items.push(Attachment::new(content, file_name, file_path));
        }
        &self.items
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<Attachment> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear_all(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Attachment] {
        &self.items
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Attachment> {
        self.items.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "attachments_test.rs"]
mod tests;
