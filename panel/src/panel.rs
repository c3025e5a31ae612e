//! Panel controller: the single event-handling context.
//!
//! DESIGN
//! ======
//! `Panel::run` is a `select!` loop over two sources: inbound host events and
//! completions of analysis calls. Each call runs in its own spawned task and
//! reports back over an internal channel, so the loop keeps accepting input
//! while requests are outstanding. Overlapping sends are allowed.
//!
//! Every in-flight request records the store epoch at send time. Clearing the
//! conversation advances the epoch, and a completion from an older epoch is
//! dropped instead of being appended to the fresh transcript.
//!
//! Outputs are fire-and-forget: a host that stopped listening does not stop
//! the panel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wire::AnalysisResponse;

use crate::conversation::ConversationStore;
use crate::events::{EventReceiver, Notice, OutputSender, PanelEvent, PanelOutput};
use crate::model::{Message, MessageStatus};
use crate::render::{render_failure, render_response};
use crate::request::{Draft, build_request, format_user_content};
use crate::transport::{AnalysisTransport, AnalyzeError};
use crate::view::PanelView;

struct Completion {
    id: Uuid,
    result: Result<AnalysisResponse, AnalyzeError>,
}

enum Step {
    Event(Option<PanelEvent>),
    Completed(Completion),
}

pub struct Panel {
    store: ConversationStore,
    draft: Draft,
    transport: Arc<dyn AnalysisTransport>,
    outputs: OutputSender,
    /// Request id -> store epoch at send time.
    in_flight: HashMap<Uuid, u64>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Panel {
    #[must_use]
    pub fn new(store: ConversationStore, transport: Arc<dyn AnalysisTransport>, outputs: OutputSender) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            draft: Draft::new(),
            transport,
            outputs,
            in_flight: HashMap::new(),
            completions_tx,
            completions_rx,
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Requests sent and not yet completed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn view(&self) -> PanelView {
        PanelView::project(&self.store, &self.draft, self.in_flight.len())
    }

    /// Process events until `inbound` closes and every in-flight request
    /// has completed, then hand the panel back.
    pub async fn run(mut self, mut inbound: EventReceiver) -> Self {
        self.emit_view();
        let mut inbound_open = true;

        loop {
            if !inbound_open && self.in_flight.is_empty() {
                break;
            }
            let step = tokio::select! {
                event = inbound.recv(), if inbound_open => Step::Event(event),
                Some(completion) = self.completions_rx.recv() => Step::Completed(completion),
                else => break,
            };
            match step {
                Step::Event(Some(event)) => self.handle_event(event),
                Step::Event(None) => {
                    debug!(pending = self.in_flight.len(), "inbound closed; draining");
                    inbound_open = false;
                }
                Step::Completed(completion) => self.complete(completion),
            }
        }
        self
    }

    /// Apply one host event and re-render.
    ///
    /// `Submit` spawns the analysis call, so it must run inside a Tokio runtime.
    pub fn handle_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::SetCode { code, file_name } => {
                self.draft.set_code(code, &file_name);
                self.emit(PanelOutput::Focus);
            }
            PanelEvent::EditCode(code) => self.draft.edit_code(code),
            PanelEvent::EditPurpose(purpose) => self.draft.edit_purpose(purpose),
            PanelEvent::Submit => self.submit(),
            PanelEvent::AddAttachment { content, file_name, file_path } => {
                let notice = format!("Attached {file_name} to chat");
                self.store.add_attachment(content, file_name, file_path);
                self.emit(PanelOutput::Focus);
                self.emit(PanelOutput::Notify(Notice::info(notice)));
            }
            PanelEvent::RemoveAttachment(index) => {
                if self.store.remove_attachment(index).is_none() {
                    debug!(index, "remove ignored; no attachment at index");
                }
            }
            PanelEvent::ClearAttachments => self.store.clear_attachments(),
            PanelEvent::ClearChat => {
                self.emit(PanelOutput::Notify(Notice::info("Clearing chat history...")));
                self.store.clear();
            }
        }
        self.emit_view();
    }

    fn submit(&mut self) {
        let Some(submission) = self.draft.take_submission() else {
            debug!("submit ignored; code or purpose empty");
            return;
        };

        let attachments = self.store.attachments().to_vec();
        let content = format_user_content(&submission.code, &submission.purpose, &attachments);
        let request = build_request(&submission.code, &submission.purpose, &attachments);
        self.store.append(Message::user(content, submission.purpose, attachments));

        let id = Uuid::new_v4();
        self.in_flight.insert(id, self.store.epoch());
        info!(%id, attachments = request.attachments.len(), pending = self.in_flight.len(), "analysis request sent");

        let transport = Arc::clone(&self.transport);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = transport.send(&request).await;
            let _ = completions.send(Completion { id, result });
        });
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { id, result } = completion;
        let Some(epoch) = self.in_flight.remove(&id) else {
            warn!(%id, "completion for unknown request");
            return;
        };

        if epoch == self.store.epoch() {
            let message = match result {
                Ok(response) => {
                    let status = if response.is_error() { MessageStatus::Error } else { MessageStatus::Ok };
                    info!(%id, status = response.status.as_str(), "analysis response received");
                    Message::assistant(render_response(&response), status)
                }
                Err(e) => {
                    warn!(%id, error = %e, "analysis request failed");
                    Message::assistant(render_failure(&e), MessageStatus::Error)
                }
            };
            self.store.append(message);
        } else {
            debug!(%id, sent_epoch = epoch, epoch = self.store.epoch(), "dropping response sent before clear");
        }
        self.emit_view();
    }

    fn emit_view(&self) {
        self.emit(PanelOutput::View(self.view()));
    }

    fn emit(&self, output: PanelOutput) {
        let _ = self.outputs.send(output);
    }
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
