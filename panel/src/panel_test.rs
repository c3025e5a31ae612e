use super::*;
use crate::events::{NoticeLevel, OutputReceiver, event_channel, output_channel};
use crate::model::{Attachment, Role, Snapshot};
use crate::persistence::MemoryStore;
use std::sync::Mutex;
use tokio::sync::Semaphore;
use wire::{AnalysisRequest, ResponseStatus};

// =========================================================================
// MockTransport
// =========================================================================

struct MockTransport {
    responses: Mutex<Vec<Result<AnalysisResponse, AnalyzeError>>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl MockTransport {
    fn new(responses: Vec<Result<AnalysisResponse, AnalyzeError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses), requests: Mutex::new(Vec::new()) })
    }

    fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AnalysisTransport for MockTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(ok_response("done", "x=1"))
        } else {
            responses.remove(0)
        }
    }
}

/// Holds every call until the test releases a permit.
struct GatedTransport {
    gate: Semaphore,
}

#[async_trait::async_trait]
impl AnalysisTransport for GatedTransport {
    async fn send(&self, _request: &AnalysisRequest) -> Result<AnalysisResponse, AnalyzeError> {
        let _permit = self.gate.acquire().await.unwrap();
        Ok(ok_response("late", "y=2"))
    }
}

// =========================================================================
// helpers
// =========================================================================

fn ok_response(message: &str, code: &str) -> AnalysisResponse {
    AnalysisResponse {
        status: ResponseStatus::Ok,
        message: Some(message.to_owned()),
        code: Some(code.to_owned()),
        ..AnalysisResponse::default()
    }
}

fn panel_with(transport: Arc<dyn AnalysisTransport>, backing: Arc<MemoryStore>) -> (Panel, OutputReceiver) {
    let (outputs, rx) = output_channel();
    let store = ConversationStore::open(backing);
    (Panel::new(store, transport, outputs), rx)
}

fn send_events(events: Vec<PanelEvent>) -> EventReceiver {
    let (tx, rx) = event_channel();
    for event in events {
        tx.send(event).unwrap();
    }
    rx
}

fn drain(rx: &mut OutputReceiver) -> Vec<PanelOutput> {
    let mut out = Vec::new();
    while let Ok(output) = rx.try_recv() {
        out.push(output);
    }
    out
}

fn last_view(outputs: &[PanelOutput]) -> PanelView {
    outputs
        .iter()
        .rev()
        .find_map(|o| match o {
            PanelOutput::View(v) => Some(v.clone()),
            _ => None,
        })
        .expect("at least one view")
}

fn ask(code: &str, purpose: &str) -> Vec<PanelEvent> {
    vec![PanelEvent::EditCode(code.into()), PanelEvent::EditPurpose(purpose.into()), PanelEvent::Submit]
}

// =========================================================================
// submit
// =========================================================================

#[tokio::test]
async fn submit_appends_user_then_assistant() {
    let backing = Arc::new(MemoryStore::new());
    let transport = MockTransport::new(vec![]);
    let (panel, mut rx) = panel_with(transport.clone(), backing.clone());

    let panel = panel.run(send_events(ask("print(x)", "fix bug"))).await;

    let messages = panel.store().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Purpose: fix bug\n\nprint(x)");
    assert_eq!(messages[0].purpose.as_deref(), Some("fix bug"));
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].status, Some(MessageStatus::Ok));
    assert!(messages[1].content.starts_with("### Success:\ndone"));

    assert_eq!(panel.draft(), &Draft::new());
    assert_eq!(panel.pending(), 0);
    assert_eq!(backing.current().unwrap().messages, messages);

    let view = last_view(&drain(&mut rx));
    assert_eq!(view.messages.len(), 2);
    assert!(!view.send_enabled);
}

#[tokio::test]
async fn submit_sends_trimmed_inputs() {
    let transport = MockTransport::new(vec![]);
    let (panel, _rx) = panel_with(transport.clone(), Arc::new(MemoryStore::new()));

    panel.run(send_events(ask("  print(x)\n", "  fix bug "))).await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code, "print(x)");
    assert_eq!(requests[0].purpose, "fix bug");
}

#[tokio::test]
async fn submit_with_blank_purpose_does_nothing() {
    let transport = MockTransport::new(vec![]);
    let (panel, _rx) = panel_with(transport.clone(), Arc::new(MemoryStore::new()));

    let panel = panel.run(send_events(ask("print(x)", "   "))).await;

    assert!(panel.store().is_empty());
    assert!(transport.requests().is_empty());
    assert_eq!(panel.draft().code(), "print(x)");
}

#[tokio::test]
async fn error_response_is_marked_error() {
    let response = AnalysisResponse {
        status: ResponseStatus::Error,
        message: Some("NameError".into()),
        ..AnalysisResponse::default()
    };
    let (panel, _rx) = panel_with(MockTransport::new(vec![Ok(response)]), Arc::new(MemoryStore::new()));

    let panel = panel.run(send_events(ask("print(x)", "fix"))).await;

    let reply = &panel.store().messages()[1];
    assert!(reply.is_error());
    assert!(reply.content.starts_with("### Error:\nNameError"));
}

#[tokio::test]
async fn transport_failure_becomes_single_error_message() {
    let failure = Err(AnalyzeError::Status { status: 502, status_text: "Bad Gateway".into() });
    let (panel, _rx) = panel_with(MockTransport::new(vec![failure]), Arc::new(MemoryStore::new()));

    let panel = panel.run(send_events(ask("print(x)", "fix"))).await;

    let messages = panel.store().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "Error analyzing code: Network response was not ok: Bad Gateway");
    assert_eq!(messages[1].status, Some(MessageStatus::Error));
}

#[tokio::test]
async fn transcript_usable_after_failure() {
    let failure = Err(AnalyzeError::Network("connection refused".into()));
    let (panel, _rx) = panel_with(MockTransport::new(vec![failure]), Arc::new(MemoryStore::new()));

    let mut events = ask("a", "first");
    events.extend(ask("b", "second"));
    let panel = panel.run(send_events(events)).await;

    assert_eq!(panel.store().len(), 4);
    assert_eq!(panel.store().messages().iter().filter(|m| m.is_error()).count(), 1);
}

// =========================================================================
// attachments
// =========================================================================

#[tokio::test]
async fn attachments_travel_with_request_and_stay_staged() {
    let transport = MockTransport::new(vec![]);
    let (panel, mut rx) = panel_with(transport.clone(), Arc::new(MemoryStore::new()));

    let mut events = vec![PanelEvent::AddAttachment {
        content: "y = 2".into(),
        file_name: "b.py".into(),
        file_path: "/p/b.py".into(),
    }];
    events.extend(ask("print(x)", "review"));
    events.extend(ask("print(y)", "again"));
    let panel = panel.run(send_events(events)).await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.attachments == vec![Attachment::new("y = 2", "b.py", "/p/b.py")]));

    let first = &panel.store().messages()[0];
    assert_eq!(first.content, "Purpose: review\n\nprint(x)\n\nAttached Files:\n- b.py\n");
    assert_eq!(first.attachment_count(), 1);
    assert_eq!(panel.store().attachments().len(), 1);

    let outputs = drain(&mut rx);
    assert!(outputs.contains(&PanelOutput::Focus));
    assert!(outputs.contains(&PanelOutput::Notify(Notice::info("Attached b.py to chat"))));
    assert_eq!(last_view(&outputs).messages[0].badge.as_deref(), Some("1 file"));
}

#[tokio::test]
async fn re_adding_a_path_replaces_content() {
    let (panel, _rx) = panel_with(MockTransport::new(vec![]), Arc::new(MemoryStore::new()));
    let add = |content: &str| PanelEvent::AddAttachment {
        content: content.into(),
        file_name: "a.py".into(),
        file_path: "/p/a.py".into(),
    };

    let panel = panel.run(send_events(vec![add("int x=1"), add("int x=2")])).await;

    let attachments = panel.store().attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].content, "int x=2");
}

#[tokio::test]
async fn remove_and_clear_attachments() {
    let (panel, _rx) = panel_with(MockTransport::new(vec![]), Arc::new(MemoryStore::new()));
    let add = |path: &str| PanelEvent::AddAttachment {
        content: "c".into(),
        file_name: path.trim_start_matches('/').into(),
        file_path: path.into(),
    };

    let events = vec![add("/a"), add("/b"), add("/c"), PanelEvent::RemoveAttachment(7), PanelEvent::RemoveAttachment(1)];
    let panel = panel.run(send_events(events)).await;
    let paths: Vec<&str> = panel.store().attachments().iter().map(|a| a.file_path.as_str()).collect();
    assert_eq!(paths, ["/a", "/c"]);

    let panel = panel.run(send_events(vec![PanelEvent::ClearAttachments])).await;
    assert!(panel.store().attachments().is_empty());
}

// =========================================================================
// clear / restore
// =========================================================================

#[tokio::test]
async fn clear_chat_empties_and_persists() {
    let backing = Arc::new(MemoryStore::with_snapshot(Snapshot {
        messages: vec![Message::assistant("old".into(), MessageStatus::Ok)],
        attachments: vec![Attachment::new("k", "k.py", "/k.py")],
    }));
    let (panel, mut rx) = panel_with(MockTransport::new(vec![]), backing.clone());

    let panel = panel.run(send_events(vec![PanelEvent::ClearChat])).await;

    assert!(panel.store().is_empty());
    let persisted = backing.current().unwrap();
    assert!(persisted.messages.is_empty());
    assert_eq!(persisted.attachments.len(), 1);

    let outputs = drain(&mut rx);
    let notice = outputs.iter().find_map(|o| match o {
        PanelOutput::Notify(n) => Some(n.clone()),
        _ => None,
    });
    assert_eq!(notice.map(|n| n.level), Some(NoticeLevel::Info));
    assert!(last_view(&outputs).messages.is_empty());
}

#[tokio::test]
async fn first_output_renders_restored_state() {
    let snapshot = Snapshot {
        messages: vec![Message::user("Purpose: a\n\nb".into(), "a".into(), vec![])],
        attachments: vec![Attachment::new("k", "k.py", "/k.py")],
    };
    let (panel, mut rx) = panel_with(MockTransport::new(vec![]), Arc::new(MemoryStore::with_snapshot(snapshot)));

    panel.run(send_events(vec![])).await;

    let outputs = drain(&mut rx);
    let PanelOutput::View(first) = &outputs[0] else {
        panic!("expected view first, got {outputs:?}");
    };
    assert_eq!(first.messages.len(), 1);
    assert_eq!(first.attachments.len(), 1);
}

// =========================================================================
// inputs
// =========================================================================

#[tokio::test]
async fn set_code_fills_inputs_and_focuses() {
    let (panel, mut rx) = panel_with(MockTransport::new(vec![]), Arc::new(MemoryStore::new()));

    let event = PanelEvent::SetCode { code: "def f(): pass".into(), file_name: "f.py".into() };
    let panel = panel.run(send_events(vec![event])).await;

    assert_eq!(panel.draft().purpose(), "Analyze f.py");
    let outputs = drain(&mut rx);
    assert!(outputs.contains(&PanelOutput::Focus));
    let view = last_view(&outputs);
    assert_eq!(view.code, "def f(): pass");
    assert!(view.send_enabled);
}

// =========================================================================
// concurrency
// =========================================================================

#[tokio::test]
async fn response_sent_before_clear_is_dropped() {
    let transport = Arc::new(GatedTransport { gate: Semaphore::new(0) });
    let (mut panel, _rx) = panel_with(transport.clone(), Arc::new(MemoryStore::new()));

    for event in ask("print(x)", "fix") {
        panel.handle_event(event);
    }
    assert_eq!(panel.pending(), 1);
    panel.handle_event(PanelEvent::ClearChat);
    transport.gate.add_permits(1);

    let panel = panel.run(send_events(vec![])).await;

    assert!(panel.store().is_empty());
    assert_eq!(panel.pending(), 0);
}

#[tokio::test]
async fn overlapping_sends_are_all_answered() {
    let transport = Arc::new(GatedTransport { gate: Semaphore::new(0) });
    let (mut panel, _rx) = panel_with(transport.clone(), Arc::new(MemoryStore::new()));

    for event in ask("a", "one").into_iter().chain(ask("b", "two")) {
        panel.handle_event(event);
    }
    assert_eq!(panel.pending(), 2);
    assert_eq!(panel.view().pending, 2);
    transport.gate.add_permits(2);

    let panel = panel.run(send_events(vec![])).await;

    let roles: Vec<Role> = panel.store().messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::User, Role::User, Role::Assistant, Role::Assistant]);
}

#[tokio::test]
async fn closed_output_sink_is_ignored() {
    let (panel, rx) = panel_with(MockTransport::new(vec![]), Arc::new(MemoryStore::new()));
    drop(rx);

    let panel = panel.run(send_events(ask("print(x)", "fix"))).await;
    assert_eq!(panel.store().len(), 2);
}
