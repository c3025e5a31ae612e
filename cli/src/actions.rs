//! Turn one CLI command into panel events.
//!
//! Files are read here, on the host side. A file that cannot be read yields
//! an error notice and no event, so the panel never sees a half-built action.

use std::path::{Path, PathBuf};

use panel::request::can_send;
use panel::{Notice, PanelEvent};

use crate::Command;

/// Events to feed the panel plus notices raised before it runs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub events: Vec<PanelEvent>,
    pub notices: Vec<Notice>,
}

impl Plan {
    fn events(events: Vec<PanelEvent>) -> Self {
        Self { events, notices: Vec::new() }
    }

    fn notice(notice: Notice) -> Self {
        Self { events: Vec::new(), notices: vec![notice] }
    }
}

/// A file read from disk.
struct SourceFile {
    content: String,
    file_name: String,
    file_path: String,
}

pub fn plan(command: &Command) -> Plan {
    match command {
        Command::Analyze { file, purpose } => match read_source(file) {
            Ok(source) => {
                let suggested = format!("Analyze {}", source.file_name);
                if !can_send(&source.content, purpose.as_deref().unwrap_or(&suggested)) {
                    return Plan::notice(nothing_to_send());
                }
                let mut events = vec![PanelEvent::SetCode { code: source.content, file_name: source.file_name }];
                if let Some(purpose) = purpose {
                    events.push(PanelEvent::EditPurpose(purpose.clone()));
                }
                events.push(PanelEvent::Submit);
                Plan::events(events)
            }
            Err(notice) => Plan::notice(notice),
        },
        Command::Send { purpose, code, file } => {
            let code = match (code, file) {
                (Some(code), _) => code.clone(),
                (None, Some(file)) => match read_source(file) {
                    Ok(source) => source.content,
                    Err(notice) => return Plan::notice(notice),
                },
                (None, None) => return Plan::notice(Notice::error("Nothing to send: pass --code or --file")),
            };
            if !can_send(&code, purpose) {
                return Plan::notice(nothing_to_send());
            }
            Plan::events(vec![
                PanelEvent::EditCode(code),
                PanelEvent::EditPurpose(purpose.clone()),
                PanelEvent::Submit,
            ])
        }
        Command::Attach { file } => match read_source(file) {
            Ok(source) => Plan::events(vec![PanelEvent::AddAttachment {
                content: source.content,
                file_name: source.file_name,
                file_path: source.file_path,
            }]),
            Err(notice) => Plan::notice(notice),
        },
        Command::Detach { index } => match index.checked_sub(1) {
            Some(position) => Plan::events(vec![PanelEvent::RemoveAttachment(position)]),
            None => Plan::notice(Notice::error("Attachment positions start at 1")),
        },
        Command::DetachAll => Plan::events(vec![PanelEvent::ClearAttachments]),
        Command::Clear => Plan::events(vec![PanelEvent::ClearChat]),
        Command::Show => Plan::default(),
    }
}

fn nothing_to_send() -> Notice {
    Notice::error("Nothing to send: code and purpose are required")
}

fn read_source(path: &Path) -> Result<SourceFile, Notice> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "file read failed");
        Notice::error(format!("Error reading file: {e}"))
    })?;
    let file_path = std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path));
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(SourceFile { content, file_name, file_path: file_path.display().to_string() })
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
