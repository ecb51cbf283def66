//! Serializable credential cache.

use graphmail_oauth::Token;
use serde::{Deserialize, Serialize};

/// A cached identity and its refresh material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAccount {
    /// Display hint for the account, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Last issued token, including refresh material.
    pub token: Token,
}

/// The credential cache persisted between runs.
///
/// Owned exclusively by [`crate::AuthSession`]; the store only moves its
/// serialized form to and from disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialCache {
    /// Cached accounts, most recently used first.
    pub accounts: Vec<CachedAccount>,
}

impl CredentialCache {
    /// Parses a cache from its serialized form.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid cache.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Serializes the cache for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// The account silent acquisition should try, if any.
    #[must_use]
    pub fn primary_account(&self) -> Option<&CachedAccount> {
        self.accounts.first()
    }

    /// Records a freshly issued token against the primary account,
    /// creating it when the cache is empty.
    pub fn store_token(&mut self, token: Token) {
        match self.accounts.first_mut() {
            Some(account) => account.token = token,
            None => self.accounts.push(CachedAccount {
                username: None,
                token,
            }),
        }
    }

    /// Drops the primary account, e.g. after its grant was revoked.
    pub fn evict_primary(&mut self) {
        if !self.accounts.is_empty() {
            self.accounts.remove(0);
        }
    }
}
