//! Transcript and snapshot types.
//!
//! DESIGN
//! ======
//! A `Message` stores its display text fully formatted at creation time and
//! is never edited afterwards. The snapshot is the unit of persistence: it
//! pairs the transcript with the staged attachments so a reloaded panel
//! comes back exactly as it was left.

use serde::{Deserialize, Serialize};

pub use wire::Attachment;

// =============================================================================
// MESSAGE
// =============================================================================

/// Who produced a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Outcome attached to assistant messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Ok,
    Error,
}

/// One entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Display text, derived once when the message is created.
    pub content: String,
    /// Purpose line of a user request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Copy of the staged attachments at the time a user request was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// Set on assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl Message {
    #[must_use]
    pub fn user(content: String, purpose: String, attachments: Vec<Attachment>) -> Self {
        Self { role: Role::User, content, purpose: Some(purpose), attachments: Some(attachments), status: None }
    }

    #[must_use]
    pub fn assistant(content: String, status: MessageStatus) -> Self {
        Self { role: Role::Assistant, content, purpose: None, attachments: None, status: Some(status) }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Some(MessageStatus::Error)
    }

    /// Number of files that travelled with this message.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.attachments.as_ref().map_or(0, Vec::len)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Durable panel state. Either half may be missing in stored data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
