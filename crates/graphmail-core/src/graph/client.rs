//! One-shot authenticated dispatch against the Graph REST API.

use super::model::{Collection, MailFolder, Message};
use super::query::MessageQuery;
use crate::auth::AuthSession;
use crate::error::GraphError;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Production Graph API base.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// The HTTP methods the dispatcher supports. A closed set: anything else
/// is unrepresentable rather than a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

/// Authenticated Graph client.
///
/// Every request first obtains a token from the shared [`AuthSession`],
/// then makes exactly one attempt against the API. There is no retry
/// policy here; callers decide whether a failed call is worth repeating.
pub struct GraphClient {
    http: reqwest::Client,
    base: Url,
    session: Arc<AuthSession>,
}

impl GraphClient {
    /// Creates a client against the production Graph endpoint.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in base URL; the `Result` form exists so
    /// [`Self::with_base_url`] and this share a signature.
    pub fn new(session: Arc<AuthSession>) -> Result<Self, url::ParseError> {
        Self::with_base_url(session, GRAPH_BASE_URL)
    }

    /// Creates a client against an alternate base URL (tests, sovereign
    /// clouds).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` does not parse as a URL.
    pub fn with_base_url(
        session: Arc<AuthSession>,
        base: impl AsRef<str>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(base.as_ref())?,
            session,
        })
    }

    /// Builds a request URL from path segments, percent-encoding each one.
    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always expose mutable path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues one authenticated request.
    ///
    /// `Ok(None)` is an empty-body success, which Graph uses for DELETE
    /// and some PATCH calls.
    ///
    /// # Errors
    ///
    /// [`GraphError::Unauthenticated`] when no token could be acquired
    /// (the network is never touched in that case), `Api` for any non-2xx
    /// response with the raw body preserved, `Transport` for
    /// connection-level failures.
    pub async fn request(
        &self,
        segments: &[&str],
        method: GraphMethod,
        body: Option<&Value>,
    ) -> Result<Option<Value>, GraphError> {
        self.dispatch(self.url_for(segments), method, body).await
    }

    async fn dispatch(
        &self,
        url: Url,
        method: GraphMethod,
        body: Option<&Value>,
    ) -> Result<Option<Value>, GraphError> {
        let token = self.session.acquire_token().await?;

        let builder = match method {
            GraphMethod::Get => self.http.get(url.clone()),
            GraphMethod::Post => self.http.post(url.clone()),
            GraphMethod::Patch => self.http.patch(url.clone()),
            GraphMethod::Delete => self.http.delete(url.clone()),
        };
        let mut builder = builder
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "Graph request failed");
            return Err(GraphError::Api {
                status: status.as_u16(),
                body: raw,
            });
        }

        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Lists messages in a folder (the inbox when `folder` is `None`),
    /// preserving the backend's ordering.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn list_messages(
        &self,
        folder: Option<&str>,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, GraphError> {
        let folder = folder.unwrap_or("Inbox");
        let mut url = self.url_for(&["me", "mailFolders", folder, "messages"]);
        query.apply(&mut url);

        match self.dispatch(url, GraphMethod::Get, None).await? {
            Some(payload) => Ok(serde_json::from_value::<Collection<Message>>(payload)?.value),
            None => Ok(Vec::new()),
        }
    }

    /// Reads a single message, including its body.
    ///
    /// # Errors
    ///
    /// See [`Self::request`]; an unknown id surfaces as `Api` with
    /// status 404.
    pub async fn get_message(&self, id: &str) -> Result<Message, GraphError> {
        let payload = self
            .request(&["me", "messages", id], GraphMethod::Get, None)
            .await?;
        Ok(serde_json::from_value(payload.unwrap_or(Value::Null))?)
    }

    /// Lists all mail folders.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn list_folders(&self) -> Result<Vec<MailFolder>, GraphError> {
        match self
            .request(&["me", "mailFolders"], GraphMethod::Get, None)
            .await?
        {
            Some(payload) => Ok(serde_json::from_value::<Collection<MailFolder>>(payload)?.value),
            None => Ok(Vec::new()),
        }
    }
}
