//! Authenticated request dispatch against the Microsoft Graph API.

mod client;
mod model;
mod query;

pub use client::{GRAPH_BASE_URL, GraphClient, GraphMethod};
pub use model::{Collection, EmailAddress, ItemBody, MailFolder, Message, Recipient};
pub use query::MessageQuery;
