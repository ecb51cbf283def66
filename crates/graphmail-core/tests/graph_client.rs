//! Dispatcher behavior against a mocked Graph backend.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use graphmail_core::{
    AuthSession, CredentialCache, GraphClient, GraphError, GraphMethod, MessageQuery, TokenStore,
};
use graphmail_oauth::{OAuthClient, Provider, Token};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session whose cache already holds a valid token, so no identity
/// provider traffic happens during these tests.
fn authenticated_session(dir: &TempDir) -> Arc<AuthSession> {
    let cache_file = dir.path().join("token_cache.json");
    let mut cache = CredentialCache::default();
    cache.store_token(
        Token::new("test-access-token", "Bearer")
            .with_expires_at(chrono::Utc::now() + chrono::Duration::hours(1)),
    );
    fs::write(&cache_file, cache.to_json().unwrap()).unwrap();

    let provider = Provider::microsoft("common").unwrap();
    Arc::new(AuthSession::new(
        OAuthClient::new("client-1", provider),
        TokenStore::new(cache_file),
        Vec::new(),
    ))
}

fn message_page(count: usize) -> serde_json::Value {
    let value: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("msg-{i}"),
                "subject": format!("Subject {i}"),
                "isRead": false
            })
        })
        .collect();
    serde_json::json!({ "value": value })
}

#[tokio::test]
async fn list_messages_preserves_count_and_order() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/Inbox/messages"))
        .and(query_param("$top", "5"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_page(5)))
        .mount(&server)
        .await;

    let client = GraphClient::with_base_url(authenticated_session(&dir), server.uri()).unwrap();
    let messages = client
        .list_messages(None, &MessageQuery::new().top(5))
        .await
        .unwrap();

    assert_eq!(messages.len(), 5);
    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["msg-0", "msg-1", "msg-2", "msg-3", "msg-4"]);
}

#[tokio::test]
async fn list_messages_targets_the_named_folder() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/Archive/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_page(1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphClient::with_base_url(authenticated_session(&dir), server.uri()).unwrap();
    let messages = client
        .list_messages(Some("Archive"), &MessageQuery::new())
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn unknown_message_id_surfaces_the_404() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/messages/no-such-id"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "ErrorItemNotFound", "message": "The specified object was not found."}
        })))
        .mount(&server)
        .await;

    let client = GraphClient::with_base_url(authenticated_session(&dir), server.uri()).unwrap();
    let err = client.get_message("no-such-id").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        GraphError::Api { body, .. } => assert!(body.contains("ErrorItemNotFound")),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_is_a_valid_success() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/me/messages/msg-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = GraphClient::with_base_url(authenticated_session(&dir), server.uri()).unwrap();
    let payload = client
        .request(&["me", "messages", "msg-1"], GraphMethod::Delete, None)
        .await
        .unwrap();
    assert!(payload.is_none());
}

#[tokio::test]
async fn connection_failure_maps_to_transport_error() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on this port.
    let client =
        GraphClient::with_base_url(authenticated_session(&dir), "http://127.0.0.1:9/v1.0").unwrap();

    let err = client.list_folders().await.unwrap_err();
    assert!(matches!(err, GraphError::Transport(_)));
}

#[tokio::test]
async fn auth_failure_short_circuits_before_the_network() {
    let dir = TempDir::new().unwrap();
    let graph_server = MockServer::start().await;
    let idp_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/devicecode"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "unauthorized_client",
            "error_description": "bad registration"
        })))
        .mount(&idp_server)
        .await;

    let provider = Provider::new(
        "Test",
        format!("{}/token", idp_server.uri()),
        format!("{}/devicecode", idp_server.uri()),
    )
    .unwrap();
    let session = Arc::new(AuthSession::new(
        OAuthClient::new("client-1", provider),
        TokenStore::new(dir.path().join("token_cache.json")),
        Vec::new(),
    ));

    let client = GraphClient::with_base_url(session, graph_server.uri()).unwrap();
    let err = client.list_folders().await.unwrap_err();

    assert!(matches!(err, GraphError::Unauthenticated(_)));
    assert!(
        graph_server.received_requests().await.unwrap().is_empty(),
        "the API must not be touched when acquisition fails"
    );
}
