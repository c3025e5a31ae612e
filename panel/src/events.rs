//! Typed channels between the host and the panel core.
//!
//! DESIGN
//! ======
//! The host talks to the panel only through `PanelEvent`s on an inbound
//! stream; the panel answers only through `PanelOutput`s on an outbound sink.
//! Both are plain `tokio::sync::mpsc` unbounded channels, so tests can drive
//! the panel without a live host.

use tokio::sync::mpsc;

use crate::view::PanelView;

/// Something the host or the user did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// A file was opened for analysis; fills the code input.
    SetCode { code: String, file_name: String },
    /// The user edited the code input.
    EditCode(String),
    /// The user edited the purpose input.
    EditPurpose(String),
    /// The user pressed send.
    Submit,
    /// A file was read for attaching.
    AddAttachment { content: String, file_name: String, file_path: String },
    /// Remove the staged attachment at this position.
    RemoveAttachment(usize),
    ClearAttachments,
    ClearChat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A notification for the host to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// Something the panel asks the host to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelOutput {
    /// Re-render from this view.
    View(PanelView),
    /// Bring the panel to the front.
    Focus,
    Notify(Notice),
}

pub type EventSender = mpsc::UnboundedSender<PanelEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PanelEvent>;
pub type OutputSender = mpsc::UnboundedSender<PanelOutput>;
pub type OutputReceiver = mpsc::UnboundedReceiver<PanelOutput>;

/// Inbound event channel.
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Outbound output channel.
#[must_use]
pub fn output_channel() -> (OutputSender, OutputReceiver) {
    mpsc::unbounded_channel()
}
