//! Diagnostic log for analysis traffic.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request payload and every response (or failure) is written here in
//! a human-readable block for post-hoc debugging. The log is injected into
//! the transport rather than reached globally. Sinks never return errors:
//! a log that cannot be written must not change the outcome of a request.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};
use wire::AnalysisRequest;

const BANNER: &str = "==================================================";

/// Line-oriented sink for diagnostic output.
pub trait DiagnosticLog: Send + Sync {
    fn append(&self, line: &str);
}

// =============================================================================
// SINKS
// =============================================================================

/// Forwards each line to `tracing` under the `diagnostics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn append(&self, line: &str) {
        info!(target: "diagnostics", "{line}");
    }
}

/// Appends lines to a file, opening it on first use.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), file: Mutex::new(None) }
    }

    fn open(&self) -> std::io::Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl DiagnosticLog for FileLog {
    fn append(&self, line: &str) {
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            match self.open() {
                Ok(file) => *slot = Some(file),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "diagnostic log unavailable");
                    return;
                }
            }
        }
        if let Some(file) = slot.as_mut() {
            if let Err(e) = writeln!(file, "{line}") {
                warn!(path = %self.path.display(), error = %e, "diagnostic log write failed");
                *slot = None;
            }
        }
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    /// All lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

impl DiagnosticLog for MemoryLog {
    fn append(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_owned());
        }
    }
}

// =============================================================================
// BLOCKS
// =============================================================================

/// Write the request block: summary, per-attachment detail, raw payload.
pub fn log_request(log: &dyn DiagnosticLog, request: &AnalysisRequest, preview_chars: usize) {
    log.append(BANNER);
    log.append("REQUEST PAYLOAD DETAILS:");
    log.append(BANNER);
    log.append(&format!("Time: {}", now_rfc3339()));
    log.append(&format!("Purpose: {}", request.purpose));
    log.append(&format!("Code length: {} characters", request.code.chars().count()));
    log.append(&format!("Code preview: {}", request.code));
    log.append(&format!("Attachments: {}", request.attachments.len()));

    if !request.attachments.is_empty() {
        log.append("\nATTACHMENTS:");
        for (index, attachment) in request.attachments.iter().enumerate() {
            log.append(&format!("\n[{}] {}", index + 1, attachment.file_name));
            log.append(&format!("    Path: {}", attachment.file_path));
            log.append(&format!("    Content length: {} characters", attachment.content.chars().count()));
            log.append(&format!("    Content preview: {}...", preview(&attachment.content, preview_chars)));
        }
    }

    log.append("\nRAW JSON PAYLOAD:");
    log.append(&serde_json::to_string_pretty(request).unwrap_or_else(|e| format!("<unserializable: {e}>")));
    log.append(BANNER);
}

/// Write the response block. Bodies that are not JSON are logged as text.
pub fn log_response_body(log: &dyn DiagnosticLog, body: &[u8]) {
    let pretty = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    log.append("\nRESPONSE FROM SERVER:");
    log.append(&pretty);
    log.append(BANNER);
}

pub fn log_failure(log: &dyn DiagnosticLog, message: &str) {
    log.append(&format!("ERROR: {message}"));
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_owned())
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
