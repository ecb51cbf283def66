//! Device Authorization Grant (RFC 8628).

use crate::client::OAuthClient;
use crate::error::{Error, Result};
use crate::token::{ErrorResponse, Token, TokenResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Device authorization response: a short-lived challenge the user
/// completes out of band while the client polls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceAuthorization {
    /// Device code presented when polling.
    pub device_code: String,
    /// User code the operator types in at the verification URI.
    pub user_code: String,
    /// Verification URI the operator visits.
    pub verification_uri: String,
    /// Complete verification URI with the code embedded (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_uri_complete: Option<String>,
    /// Challenge validity window in seconds.
    pub expires_in: u32,
    /// Polling interval in seconds.
    #[serde(default = "default_interval")]
    pub interval: u32,
}

const fn default_interval() -> u32 {
    5
}

/// Device Authorization Grant flow.
///
/// Suitable for clients with no browser: the user authenticates on a
/// separate device using a displayed code while this client polls the
/// token endpoint for completion.
#[derive(Debug)]
pub struct DeviceFlow {
    client: OAuthClient,
}

impl DeviceFlow {
    /// Creates a new device flow around an OAuth client.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self { client }
    }

    /// Requests a device authorization challenge from the server.
    ///
    /// `scopes` are combined with the provider's base scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the
    /// client registration (bad client id or scopes).
    pub async fn request_device_authorization(
        &self,
        scopes: &[String],
    ) -> Result<DeviceAuthorization> {
        let scope_str = self.client.provider.scope_string(scopes);

        let mut params = HashMap::new();
        params.insert("client_id", self.client.client_id.as_str());
        if !scope_str.is_empty() {
            params.insert("scope", &scope_str);
        }

        let response = self
            .client
            .http_client
            .post(self.client.provider.device_auth_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        let challenge: DeviceAuthorization = response.json().await?;
        if challenge.user_code.is_empty() {
            return Err(Error::InvalidConfig(
                "device authorization response carried no user code".into(),
            ));
        }
        Ok(challenge)
    }

    /// Sleeps out the polling interval, then asks the token endpoint once
    /// whether the user has completed authorization.
    ///
    /// # Errors
    ///
    /// `authorization_pending` and `slow_down` come back as `OAuth` errors
    /// the caller should keep polling on; `access_denied` maps to
    /// [`Error::AccessDenied`] and `expired_token` to
    /// [`Error::TokenExpired`].
    pub async fn poll_for_token(&self, device_code: &str, interval: Duration) -> Result<Token> {
        tokio::time::sleep(interval).await;

        let mut params = HashMap::new();
        params.insert("grant_type", "urn:ietf:params:oauth:grant-type:device_code");
        params.insert("device_code", device_code);
        params.insert("client_id", &self.client.client_id);
        if let Some(secret) = &self.client.client_secret {
            params.insert("client_secret", secret);
        }

        let response = self
            .client
            .http_client
            .post(self.client.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;

            return match error.error.as_str() {
                "authorization_pending" => Err(Error::oauth_error(
                    "authorization_pending",
                    "User has not yet authorized",
                )),
                "slow_down" => Err(Error::oauth_error(
                    "slow_down",
                    "Polling too frequently, slow down",
                )),
                "access_denied" => Err(Error::AccessDenied),
                "expired_token" => Err(Error::TokenExpired),
                _ => Err(error.into_error()),
            };
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(Token::from_response(token_response))
    }

    /// Polls until the challenge resolves, bounded by the challenge's own
    /// validity window. Never blocks past `expires_in` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the window lapses without a grant,
    /// [`Error::AccessDenied`] if the user declines, or any non-recoverable
    /// server error.
    pub async fn wait_for_token(&self, challenge: &DeviceAuthorization) -> Result<Token> {
        let deadline = Duration::from_secs(u64::from(challenge.expires_in));
        let mut interval = Duration::from_secs(u64::from(challenge.interval));

        let poll_loop = async {
            loop {
                match self.poll_for_token(&challenge.device_code, interval).await {
                    Ok(token) => return Ok(token),
                    Err(Error::OAuth { ref error, .. }) if error == "authorization_pending" => {
                        debug!("device authorization pending");
                    }
                    Err(Error::OAuth { ref error, .. }) if error == "slow_down" => {
                        // RFC 8628 section 3.5: grow the interval by 5s.
                        interval += Duration::from_secs(5);
                        debug!(?interval, "server asked to slow down polling");
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        match tokio::time::timeout(deadline, poll_loop).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(u64::from(challenge.expires_in))),
        }
    }
}
