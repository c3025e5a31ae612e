//! Request formatting and the input drafts that feed it.
//!
//! The draft holds what the user is typing. A submission exists only when
//! both fields are non-empty after trimming; formatting never re-checks.

use std::fmt::Write;

use wire::AnalysisRequest;

use crate::model::Attachment;

/// Whether a send may go out for these inputs.
#[must_use]
pub fn can_send(code: &str, purpose: &str) -> bool {
    !code.trim().is_empty() && !purpose.trim().is_empty()
}

/// Payload for `POST /analyze`. Attachments are copied, not borrowed.
#[must_use]
pub fn build_request(code: &str, purpose: &str, attachments: &[Attachment]) -> AnalysisRequest {
    AnalysisRequest { code: code.to_owned(), purpose: purpose.to_owned(), attachments: attachments.to_vec() }
}

/// Display text for the user message of a request.
#[must_use]
pub fn format_user_content(code: &str, purpose: &str, attachments: &[Attachment]) -> String {
    let mut content = format!("Purpose: {purpose}\n\n{code}");
    if !attachments.is_empty() {
        content.push_str("\n\nAttached Files:\n");
        for attachment in attachments {
            let _ = writeln!(content, "- {}", attachment.file_name);
        }
    }
    content
}

// =============================================================================
// DRAFT
// =============================================================================

/// Trimmed code and purpose taken from the draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub code: String,
    pub purpose: String,
}

/// Unsent text in the code and purpose inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    code: String,
    purpose: String,
}

impl Draft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file into the code input and suggest a purpose for it.
    pub fn set_code(&mut self, code: impl Into<String>, file_name: &str) {
        self.code = code.into();
        self.purpose = format!("Analyze {file_name}");
    }

    pub fn edit_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn edit_purpose(&mut self, purpose: impl Into<String>) {
        self.purpose = purpose.into();
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        can_send(&self.code, &self.purpose)
    }

    /// Take the trimmed inputs and clear both fields.
    ///
    /// Returns `None` and leaves the draft untouched when sending is disabled.
    pub fn take_submission(&mut self) -> Option<Submission> {
        if !self.can_send() {
            return None;
        }
        let submission = Submission { code: self.code.trim().to_owned(), purpose: self.purpose.trim().to_owned() };
        self.code.clear();
        self.purpose.clear();
        Some(submission)
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
