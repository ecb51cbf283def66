//! Token acquisition: credential cache, on-disk store, and the
//! single-flight acquisition session.

mod cache;
mod session;
mod store;

pub use cache::{CachedAccount, CredentialCache};
pub use session::AuthSession;
pub use store::TokenStore;
