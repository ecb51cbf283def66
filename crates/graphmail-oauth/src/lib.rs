//! # graphmail-oauth
//!
//! `OAuth2` device-flow client for the Microsoft identity platform
//! (RFC 8628).
//!
//! Built for clients that cannot open a browser: the app displays a short
//! user code, the user completes sign-in on another device, and the client
//! polls the token endpoint until the grant is issued.
//!
//! ## Quick Start
//!
//! ```ignore
//! use graphmail_oauth::{DeviceFlow, OAuthClient, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::microsoft("common")?;
//!     let client = OAuthClient::new("your_client_id", provider);
//!     let flow = DeviceFlow::new(client);
//!
//!     let challenge = flow.request_device_authorization(None).await?;
//!     println!("Visit {} and enter {}", challenge.verification_uri, challenge.user_code);
//!
//!     let token = flow.wait_for_token(&challenge).await?;
//!     println!("Access token acquired, expires at {:?}", token.expires_at);
//!     Ok(())
//! }
//! ```
//!
//! ## Token Refresh
//!
//! ```ignore
//! if token.is_expired() {
//!     let token = client.refresh_token(&token).await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod device;
mod error;
pub mod provider;
pub mod token;

pub use client::OAuthClient;
pub use device::{DeviceAuthorization, DeviceFlow};
pub use error::{Error, Result};
pub use provider::Provider;
pub use token::Token;
