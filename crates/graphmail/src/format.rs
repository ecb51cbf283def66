//! Text rendering of Graph results for tool output.

use chrono::{DateTime, Utc};
use graphmail_core::{MailFolder, Message, Recipient};
use std::fmt::Write;

fn render_address(recipient: Option<&Recipient>) -> String {
    let (name, address) = recipient
        .map(|r| {
            (
                r.email_address.name.as_deref().unwrap_or("Unknown"),
                r.email_address.address.as_deref().unwrap_or("Unknown"),
            )
        })
        .unwrap_or(("Unknown", "Unknown"));
    format!("{name} <{address}>")
}

fn render_received(received: Option<DateTime<Utc>>) -> String {
    received.map_or_else(
        || "Unknown".to_string(),
        |dt| dt.format("%b %d, %I:%M %p").to_string(),
    )
}

/// Renders a message listing.
#[must_use]
pub fn message_list(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No emails found matching your criteria.".to_string();
    }

    let entries: Vec<String> = messages
        .iter()
        .map(|message| {
            let mut entry = String::new();
            let _ = writeln!(
                entry,
                "**Subject:** {}",
                message.subject.as_deref().unwrap_or("No Subject")
            );
            let _ = writeln!(entry, "**From:** {}", render_address(message.sender.as_ref()));
            let _ = writeln!(entry, "**Date:** {}", render_received(message.received_date_time));
            let _ = writeln!(entry, "**Read:** {}", if message.is_read { "Yes" } else { "No" });
            let _ = writeln!(entry, "**ID:** {}", message.id);
            if message.has_attachments {
                let _ = writeln!(entry, "**Attachments:** Yes");
            }
            entry
        })
        .collect();

    format!(
        "Found {} email(s):\n\n{}",
        messages.len(),
        entries.join("\n---\n\n")
    )
}

/// Renders a single message with its body.
#[must_use]
pub fn message_detail(message: &Message) -> String {
    let to_list = if message.to_recipients.is_empty() {
        "Unknown".to_string()
    } else {
        message
            .to_recipients
            .iter()
            .map(|r| render_address(Some(r)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let body = message
        .body
        .as_ref()
        .and_then(|b| b.content.as_deref())
        .unwrap_or("No content");

    format!(
        "**Subject:** {}\n\n**From:** {}\n**To:** {}\n**Date:** {}\n\n**Body:**\n{}",
        message.subject.as_deref().unwrap_or("No Subject"),
        render_address(message.sender.as_ref()),
        to_list,
        render_received(message.received_date_time),
        body
    )
}

/// Renders the folder listing with unread and total counts.
#[must_use]
pub fn folder_list(folders: &[MailFolder]) -> String {
    if folders.is_empty() {
        return "No folders found.".to_string();
    }

    let entries: Vec<String> = folders
        .iter()
        .map(|folder| {
            format!(
                "**{}**\n  Unread: {}\n  Total: {}",
                folder.display_name.as_deref().unwrap_or("Unknown"),
                folder.unread_item_count,
                folder.total_item_count
            )
        })
        .collect();

    format!("Email Folders:\n\n{}", entries.join("\n\n"))
}
