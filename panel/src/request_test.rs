use super::*;

// =============================================================================
// can_send
// =============================================================================

#[test]
fn can_send_requires_both_fields() {
    assert!(can_send("x", "y"));
    assert!(!can_send("", "y"));
    assert!(!can_send("x", ""));
    assert!(!can_send("  \n\t", "y"));
    assert!(!can_send("x", "   "));
}

// =============================================================================
// format_user_content
// =============================================================================

#[test]
fn user_content_without_attachments() {
    assert_eq!(format_user_content("print(x)", "fix bug", &[]), "Purpose: fix bug\n\nprint(x)");
}

#[test]
fn user_content_lists_each_attachment() {
    let attachments = [Attachment::new("a", "a.py", "/p/a.py"), Attachment::new("b", "b.py", "/p/b.py")];
    let content = format_user_content("main()", "review", &attachments);
    assert_eq!(content, "Purpose: review\n\nmain()\n\nAttached Files:\n- a.py\n- b.py\n");
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn build_request_copies_attachments() {
    let mut attachments = vec![Attachment::new("a", "a.py", "/p/a.py")];
    let request = build_request("code", "why", &attachments);
    attachments[0].content = "changed".into();
    attachments.clear();

    assert_eq!(request.code, "code");
    assert_eq!(request.purpose, "why");
    assert_eq!(request.attachments.len(), 1);
    assert_eq!(request.attachments[0].content, "a");
}

// =============================================================================
// Draft
// =============================================================================

#[test]
fn set_code_fills_code_and_purpose() {
    let mut draft = Draft::new();
    draft.set_code("def f(): pass", "f.py");
    assert_eq!(draft.code(), "def f(): pass");
    assert_eq!(draft.purpose(), "Analyze f.py");
    assert!(draft.can_send());
}

#[test]
fn take_submission_trims_and_clears() {
    let mut draft = Draft::new();
    draft.edit_code("  print(x)\n");
    draft.edit_purpose(" fix bug ");
    let submission = draft.take_submission().unwrap();
    assert_eq!(submission, Submission { code: "print(x)".into(), purpose: "fix bug".into() });
    assert_eq!(draft, Draft::new());
    assert!(!draft.can_send());
}

#[test]
fn take_submission_disabled_keeps_draft() {
    let mut draft = Draft::new();
    draft.edit_code("print(x)");
    assert!(draft.take_submission().is_none());
    assert_eq!(draft.code(), "print(x)");
}
