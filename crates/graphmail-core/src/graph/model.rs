//! Typed subsets of Graph mail resources.
//!
//! Only the fields the tools render are modeled; everything else in a
//! Graph payload is ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Graph collection envelope (`{"value": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    /// Items in backend order.
    #[serde(default)]
    pub value: Vec<T>,
}

/// An address with its display name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// SMTP address.
    #[serde(default)]
    pub address: Option<String>,
}

/// A message participant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// The participant's address.
    #[serde(default)]
    pub email_address: EmailAddress,
}

/// A message body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    /// `text` or `html`.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Body content.
    #[serde(default)]
    pub content: Option<String>,
}

/// An Outlook message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Graph message id.
    pub id: String,
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Sender.
    #[serde(default)]
    pub sender: Option<Recipient>,
    /// To recipients.
    #[serde(default)]
    pub to_recipients: Vec<Recipient>,
    /// Delivery timestamp.
    #[serde(default)]
    pub received_date_time: Option<DateTime<Utc>>,
    /// Read flag.
    #[serde(default)]
    pub is_read: bool,
    /// Attachment flag.
    #[serde(default)]
    pub has_attachments: bool,
    /// Body, present on single-message reads.
    #[serde(default)]
    pub body: Option<ItemBody>,
}

/// An Outlook mail folder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFolder {
    /// Graph folder id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Unread message count.
    #[serde(default)]
    pub unread_item_count: u64,
    /// Total message count.
    #[serde(default)]
    pub total_item_count: u64,
}
