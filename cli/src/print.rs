//! Plain-text rendering of panel output for a terminal.

use std::fmt::Write;

use panel::events::NoticeLevel;
use panel::model::Role;
use panel::view::MessageView;
use panel::{Notice, PanelView};

pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("info: {}", notice.text),
        NoticeLevel::Error => format!("error: {}", notice.text),
    }
}

/// Transcript first, then the staged attachments if any.
pub fn render_view(view: &PanelView) -> String {
    let mut out = String::new();
    if view.messages.is_empty() {
        out.push_str("No messages yet.\n");
    }
    for message in &view.messages {
        let _ = writeln!(out, "{}", header(message));
        let _ = writeln!(out, "{}\n", message.content.trim_end());
    }
    if !view.attachments.is_empty() {
        out.push_str("Attached files:\n");
        for attachment in &view.attachments {
            let _ = writeln!(out, "  {}. {} ({})", attachment.index + 1, attachment.file_name, attachment.file_path);
        }
    }
    out
}

fn header(message: &MessageView) -> String {
    let mut header = match message.role {
        Role::User => "[you]".to_owned(),
        Role::Assistant if message.is_error => "[analyzer: error]".to_owned(),
        Role::Assistant => "[analyzer]".to_owned(),
    };
    if let Some(badge) = &message.badge {
        let _ = write!(header, " ({badge})");
    }
    header
}

#[cfg(test)]
#[path = "print_test.rs"]
mod tests;
