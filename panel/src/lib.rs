//! Code-analysis chat panel core.
//!
//! SYSTEM CONTEXT
//! ==============
//! A host (editor extension, CLI) feeds `PanelEvent`s into a [`Panel`] and
//! draws the `PanelOutput`s it emits. The panel keeps the conversation and
//! staged attachments in a [`ConversationStore`], sends analysis requests
//! through an [`AnalysisTransport`], and renders every reply into an
//! assistant message.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails the host. Transport failures become error messages in
//! the transcript, persistence failures are logged and ignored, and a
//! missing or unreadable snapshot starts an empty conversation.

pub mod attachments;
pub mod config;
pub mod conversation;
pub mod diagnostics;
pub mod events;
pub mod model;
pub mod panel;
pub mod persistence;
pub mod render;
pub mod request;
pub mod transport;
pub mod view;

pub use config::PanelConfig;
pub use conversation::ConversationStore;
pub use events::{Notice, NoticeLevel, PanelEvent, PanelOutput, event_channel, output_channel};
pub use panel::Panel;
pub use persistence::{JsonFileStore, SnapshotStore};
pub use transport::{AnalysisTransport, AnalyzeError, HttpTransport};
pub use view::PanelView;
