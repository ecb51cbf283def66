//! Single-flight token acquisition session.

use super::cache::CredentialCache;
use super::store::TokenStore;
use crate::error::AuthError;
use graphmail_oauth::{DeviceFlow, OAuthClient, Token};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// State guarded by the session mutex.
struct SessionState {
    /// Whether the on-disk cache has been read this process.
    loaded: bool,
    cache: CredentialCache,
}

/// Owns one identity's token lifecycle: silent acquisition from cached
/// refresh material first, a device-code challenge when that cannot help.
///
/// All acquisition runs under one async mutex. Concurrent callers with a
/// cold cache never race into two device-code challenges: the first takes
/// the interactive path, persists the result, and every waiter then
/// resolves silently from the refreshed cache.
pub struct AuthSession {
    oauth: OAuthClient,
    store: TokenStore,
    scopes: Vec<String>,
    state: Mutex<SessionState>,
}

impl AuthSession {
    /// Creates a session. The on-disk cache is loaded lazily on the first
    /// acquisition.
    #[must_use]
    pub fn new(oauth: OAuthClient, store: TokenStore, scopes: Vec<String>) -> Self {
        Self {
            oauth,
            store,
            scopes,
            state: Mutex::new(SessionState {
                loaded: false,
                cache: CredentialCache::default(),
            }),
        }
    }

    /// Returns a bearer access token for the configured scopes.
    ///
    /// Silent path first: an unexpired cached token is returned as-is; an
    /// expired one with refresh material is refreshed and the rotated
    /// cache persisted. Only when the cache cannot help does this start a
    /// device-code challenge, log the verification URI and user code for
    /// the operator, and block until the user completes sign-in or the
    /// challenge expires. Dropping the future aborts a pending challenge;
    /// nothing partial is persisted.
    ///
    /// # Errors
    ///
    /// See [`AuthError`] for the failure taxonomy. No variant retries
    /// automatically; a later call starts the machine over.
    pub async fn acquire_token(&self) -> Result<String, AuthError> {
        let mut state = self.state.lock().await;

        if !state.loaded {
            state.cache = self.load_cache();
            state.loaded = true;
        }

        if let Some(token) = self.acquire_silent(&mut state).await? {
            return Ok(token);
        }
        self.acquire_interactive(&mut state).await
    }

    /// Reads the persisted cache, degrading to empty on any problem.
    fn load_cache(&self) -> CredentialCache {
        match self.store.load() {
            Some(raw) => match CredentialCache::from_json(&raw) {
                Ok(cache) => {
                    debug!(accounts = cache.accounts.len(), "token cache loaded");
                    cache
                }
                Err(e) => {
                    warn!(error = %e, "token cache is corrupt, starting empty");
                    CredentialCache::default()
                }
            },
            None => CredentialCache::default(),
        }
    }

    /// Persists the cache; failure costs future processes the cache but
    /// never the in-flight request.
    fn persist(&self, cache: &CredentialCache) {
        let serialized = match cache.to_json() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "could not serialize token cache");
                return;
            }
        };
        if let Err(e) = self.store.save(&serialized) {
            error!(path = %self.store.path().display(), error = %e, "could not save token cache");
        }
    }

    /// Tries to produce a token without user interaction.
    ///
    /// `Ok(None)` means "nothing usable cached, go interactive". A
    /// transient transport failure during refresh surfaces as
    /// [`AuthError::SilentAcquisitionFailed`] instead of burning the
    /// user's refresh grant on an unnecessary re-authentication.
    async fn acquire_silent(
        &self,
        state: &mut SessionState,
    ) -> Result<Option<String>, AuthError> {
        let Some(account) = state.cache.primary_account() else {
            return Ok(None);
        };

        if account.token.is_valid() {
            debug!("using cached access token");
            return Ok(Some(account.token.access_token.clone()));
        }

        if account.token.refresh_token.is_none() {
            debug!("cached token expired with no refresh material");
            return Ok(None);
        }

        match self.oauth.refresh_token(&account.token).await {
            Ok(token) => {
                debug!(expires_at = ?token.expires_at, "access token refreshed silently");
                let access = token.access_token.clone();
                state.cache.store_token(token);
                self.persist(&state.cache);
                Ok(Some(access))
            }
            Err(e) if e.is_grant_rejection() => {
                warn!(error = %e, "refresh grant rejected, re-authentication required");
                state.cache.evict_primary();
                self.persist(&state.cache);
                Ok(None)
            }
            Err(e) => Err(AuthError::SilentAcquisitionFailed(e.to_string())),
        }
    }

    /// Runs one device-code challenge to completion.
    async fn acquire_interactive(
        &self,
        state: &mut SessionState,
    ) -> Result<String, AuthError> {
        let flow = DeviceFlow::new(self.oauth.clone());

        let challenge = flow
            .request_device_authorization(&self.scopes)
            .await
            .map_err(|e| AuthError::FlowInitiationFailed(e.to_string()))?;

        // Operator surface: this never reaches the tool caller.
        info!(
            verification_uri = %challenge.verification_uri,
            user_code = %challenge.user_code,
            expires_in = challenge.expires_in,
            "to authenticate, visit the verification URI and enter the user code"
        );

        let token: Token = flow
            .wait_for_token(&challenge)
            .await
            .map_err(|e| AuthError::InteractiveAuthFailed(e.to_string()))?;

        info!("interactive authentication completed");
        let access = token.access_token.clone();
        state.cache.store_token(token);
        self.persist(&state.cache);
        Ok(access)
    }
}
