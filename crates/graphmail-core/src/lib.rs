//! # graphmail-core
//!
//! Token lifecycle and authenticated Microsoft Graph dispatch for
//! `GraphMail`.
//!
//! This crate provides:
//! - [`AuthSession`] - single-flight token acquisition (silent first,
//!   device-code flow when the cache cannot help)
//! - [`TokenStore`] - crash-safe on-disk persistence of the credential
//!   cache
//! - [`GraphClient`] - one-shot authenticated requests against the Graph
//!   REST API, with typed mail operations on top

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
mod error;
pub mod graph;

pub use auth::{AuthSession, CachedAccount, CredentialCache, TokenStore};
pub use error::{AuthError, GraphError};
pub use graph::{
    Collection, EmailAddress, GraphClient, GraphMethod, ItemBody, MailFolder, Message,
    MessageQuery, Recipient,
};
