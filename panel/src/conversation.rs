//! Conversation store: the transcript plus staged attachments.
//!
//! DESIGN
//! ======
//! Every mutating call writes a fresh snapshot before returning, so the
//! persisted transcript never lags the visible one. The transcript is
//! append-only; the only way to drop messages is `clear`, which also
//! advances the epoch used to recognise responses to requests sent before
//! the clear.

use std::sync::Arc;

use tracing::{debug, info};

use crate::attachments::AttachmentSet;
use crate::model::{Attachment, Message, Snapshot};
use crate::persistence::{self, SnapshotStore};

pub struct ConversationStore {
    messages: Vec<Message>,
    attachments: AttachmentSet,
    epoch: u64,
    persistence: Arc<dyn SnapshotStore>,
}

impl ConversationStore {
    /// Empty store backed by `persistence`. Nothing is loaded.
    #[must_use]
    pub fn new(persistence: Arc<dyn SnapshotStore>) -> Self {
        Self { messages: Vec::new(), attachments: AttachmentSet::new(), epoch: 0, persistence }
    }

    /// Store restored from whatever `persistence` holds.
    #[must_use]
    pub fn open(persistence: Arc<dyn SnapshotStore>) -> Self {
        let mut store = Self::new(Arc::clone(&persistence));
        match persistence::load_or_none(persistence.as_ref()) {
            Some(snapshot) => store.restore(snapshot),
            None => debug!("no stored snapshot; starting empty"),
        }
        store
    }

    /// Replace the transcript and attachments with `snapshot`.
    pub fn restore(&mut self, snapshot: Snapshot) {
        info!(
            messages = snapshot.messages.len(),
            attachments = snapshot.attachments.len(),
            "conversation restored"
        );
        self.messages = snapshot.messages;
        self.attachments = AttachmentSet::from_vec(snapshot.attachments);
    }

    // -------------------------------------------------------------------------
    // transcript
    // -------------------------------------------------------------------------

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.persist();
    }

    /// Drop the whole transcript. Attachments are kept.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.epoch += 1;
        info!(epoch = self.epoch, "conversation cleared");
        self.persist();
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of clears since the store was created.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // -------------------------------------------------------------------------
    // attachments
    // -------------------------------------------------------------------------

    pub fn add_attachment(
        &mut self,
        content: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> &[Attachment] {
        self.attachments.add(content, file_name, file_path);
        self.persist();
        self.attachments.as_slice()
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        let removed = self.attachments.remove_at(index)?;
        self.persist();
        Some(removed)
    }

    pub fn clear_attachments(&mut self) {
        self.attachments.clear_all();
        self.persist();
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.as_slice()
    }

    // -------------------------------------------------------------------------
    // snapshot
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { messages: self.messages.clone(), attachments: self.attachments.to_vec() }
    }

    fn persist(&self) {
        persistence::save_quietly(self.persistence.as_ref(), &self.snapshot());
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
