//! Shared `OAuth2` client configuration and token refresh.

use crate::error::Result;
use crate::provider::Provider;
use crate::token::{ErrorResponse, Token, TokenResponse};
use reqwest::Client;
use std::collections::HashMap;

/// `OAuth2` client bound to a provider and application registration.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from the application registration.
    pub client_id: String,
    /// Client secret (optional for public clients).
    pub client_secret: Option<String>,
    /// Redirect URI from the app registration. The device flow never
    /// redirects; kept for registration parity.
    pub redirect_uri: Option<String>,
    /// Provider configuration.
    pub provider: Provider,
    /// HTTP client, shared across flows.
    pub(crate) http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
            provider,
            http_client: Client::new(),
        }
    }

    /// Sets the client secret for confidential clients.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The returned token keeps the old refresh token when the server does
    /// not rotate it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoRefreshToken`] if `token` carries no
    /// refresh material, an `OAuth` error if the server rejects the grant,
    /// or an `Http` error on transport failure.
    pub async fn refresh_token(&self, token: &Token) -> Result<Token> {
        let refresh_token = token.refresh_token()?;

        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", &self.client_id);

        if let Some(secret) = &self.client_secret {
            params.insert("client_secret", secret);
        }

        let response = self
            .http_client
            .post(self.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        let token_response: TokenResponse = response.json().await?;
        let mut new_token = Token::from_response(token_response);

        // Some servers omit the refresh token when it has not rotated.
        if new_token.refresh_token.is_none() {
            new_token.refresh_token.clone_from(&token.refresh_token);
        }

        Ok(new_token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OAuthClient {
        let provider = Provider::new(
            "Test",
            format!("{}/token", server.uri()),
            format!("{}/devicecode", server.uri()),
        )
        .unwrap();
        OAuthClient::new("client-1", provider)
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "new-refresh"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let old = Token::new("old-access", "Bearer").with_refresh_token("old-refresh");
        let new = client.refresh_token(&old).await.unwrap();

        assert_eq!(new.access_token, "new-access");
        assert_eq!(new.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn test_refresh_preserves_unrotated_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let old = Token::new("old-access", "Bearer").with_refresh_token("old-refresh");
        let new = client.refresh_token(&old).await.unwrap();

        assert_eq!(new.refresh_token.as_deref(), Some("old-refresh"));
    }

    #[tokio::test]
    async fn test_refresh_rejected_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "refresh token revoked"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let old = Token::new("old-access", "Bearer").with_refresh_token("revoked");
        let err = client.refresh_token(&old).await.unwrap_err();

        assert!(matches!(err, Error::OAuth { ref error, .. } if error == "invalid_grant"));
        assert!(err.is_grant_rejection());
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let token = Token::new("access", "Bearer");
        assert!(matches!(
            client.refresh_token(&token).await,
            Err(Error::NoRefreshToken)
        ));
    }
}
