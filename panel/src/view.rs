//! Render model derived from panel state.
//!
//! The host draws exactly what a `PanelView` holds; it is rebuilt from the
//! store after every change and never edited in place.

use crate::conversation::ConversationStore;
use crate::model::{Message, Role};
use crate::request::Draft;

/// One transcript row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub is_error: bool,
    /// Attachment count badge on user rows, e.g. `"2 files"`.
    pub badge: Option<String>,
    pub content: String,
}

impl MessageView {
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        let badge = match message.role {
            Role::User => attachment_badge(message.attachment_count()),
            Role::Assistant => None,
        };
        Self { role: message.role, is_error: message.is_error(), badge, content: message.content.clone() }
    }

    /// Style classes for the row, e.g. `"message assistant error"`.
    #[must_use]
    pub fn class_name(&self) -> String {
        let mut class = format!("message {}", self.role.as_str());
        if self.is_error {
            class.push_str(" error");
        }
        class
    }
}

/// One staged attachment row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentView {
    pub index: usize,
    pub file_name: String,
    pub file_path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
    pub messages: Vec<MessageView>,
    /// Empty list means the attachment area is hidden.
    pub attachments: Vec<AttachmentView>,
    pub code: String,
    pub purpose: String,
    pub send_enabled: bool,
    /// Requests sent and not yet answered.
    pub pending: usize,
}

impl PanelView {
    #[must_use]
    pub fn project(store: &ConversationStore, draft: &Draft, pending: usize) -> Self {
        Self {
            messages: store.messages().iter().map(MessageView::from_message).collect(),
            attachments: store
                .attachments()
                .iter()
                .enumerate()
                .map(|(index, a)| AttachmentView {
                    index,
                    file_name: a.file_name.clone(),
                    file_path: a.file_path.clone(),
                })
                .collect(),
            code: draft.code().to_owned(),
            purpose: draft.purpose().to_owned(),
            send_enabled: draft.can_send(),
            pending,
        }
    }
}

/// `"1 file"`, `"3 files"`, or nothing for zero.
#[must_use]
pub fn attachment_badge(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 file".to_owned()),
        n => Some(format!("{n} files")),
    }
}
