//! Analysis response → display text.
//!
//! DESIGN
//! ======
//! `render_response` is a pure function and total over every decoded
//! response: absent optional fields render as empty text or an omitted
//! section, never as an error. The output is markdown-flavoured plain text
//! and is stored verbatim as the assistant message content.
//!
//! Fix suggestions that arrive as `{ "text": ... }` objects are prompt echoes
//! from the backend. `strip_suggestion_text` removes the echoed instruction
//! line and the outer code fence before display.

use std::fmt::Display;

use wire::{AnalysisResponse, FileAnalysis, FixSuggestion};

/// Instruction line the backend echoes at the start of structured suggestions.
pub const FIX_BOILERPLATE: &str = "Analyze the following Python code and suggest fixes:";

const FENCE: &str = "```";

/// Render a full analysis response.
#[must_use]
pub fn render_response(response: &AnalysisResponse) -> String {
    let mut out = if response.is_error() { render_error(response) } else { render_success(response) };

    if !response.file_analysis.is_empty() {
        out.push_str("\n\n### Attached Files Analysis:");
        if !response.is_error() && response.has_file_errors() {
            out.push_str("\n⚠️ **Some attached files have errors:**");
        }
        for file in &response.file_analysis {
            render_file(&mut out, file);
        }
    }
    out
}

/// Display text for a request that never produced a response.
#[must_use]
pub fn render_failure(err: &impl Display) -> String {
    format!("Error analyzing code: {err}")
}

/// Text of a fix suggestion as it should be shown.
#[must_use]
pub fn normalize_fix_suggestion(fix: &FixSuggestion) -> String {
    match fix {
        FixSuggestion::Text(text) => text.clone(),
        FixSuggestion::Structured { .. } => strip_suggestion_text(fix.raw_text()),
    }
}

/// Drop the echoed instruction line, the first opening fence and a closing
/// fence at the very end, then trim.
#[must_use]
pub fn strip_suggestion_text(text: &str) -> String {
    let text = text.replacen(FIX_BOILERPLATE, "", 1);
    let text = text.replacen("```\n", "", 1);
    let text = text.strip_suffix(FENCE).unwrap_or(&text);
    text.trim().to_owned()
}

// =============================================================================
// BRANCHES
// =============================================================================

fn render_error(response: &AnalysisResponse) -> String {
    let message = response
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("Unknown error");
    let mut out = format!("### Error:\n{message}\n\n");

    if let Some(fix) = response.fix_suggestion.as_ref().filter(|f| f.is_present()) {
        out.push_str("### Suggested Fix:\n");
        push_fenced(&mut out, &normalize_fix_suggestion(fix));
        out.push_str("\n\n");
    }

    if let Some(code) = response.refactored_code.as_deref().filter(|c| !c.is_empty()) {
        out.push_str("### Refactored Code:\n");
        push_fenced(&mut out, &trim_lines(code));
    }
    out
}

fn render_success(response: &AnalysisResponse) -> String {
    let message = response.message.as_deref().unwrap_or_default();
    let code = response.code.as_deref().unwrap_or_default();
    let mut out = format!("### Success:\n{message}\n\n### Code:\n");
    push_fenced(&mut out, code);
    out
}

fn render_file(out: &mut String, file: &FileAnalysis) {
    let status = if file.is_error() { "❌ Error" } else { "✅ Success" };
    out.push_str(&format!(
        "\n\n#### {}:\n**Status**: {status}\n**Message**: {}\n",
        file.file_name, file.message
    ));
    if file.is_error() {
        if let Some(fix) = file.fix_suggestion.as_ref().filter(|f| f.is_present()) {
            out.push_str("\n**Suggested Fix**:\n");
            push_fenced(out, &normalize_fix_suggestion(fix));
        }
    }
}

fn push_fenced(out: &mut String, body: &str) {
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(body);
    out.push('\n');
    out.push_str(FENCE);
}

fn trim_lines(code: &str) -> String {
    code.split('\n').map(str::trim).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
