//! Error types for token acquisition and Graph dispatch.

use thiserror::Error;

/// Errors from the token acquisition state machine.
///
/// None of these retry automatically; a fresh [`crate::AuthSession`]
/// acquisition starts the machine over.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider refused to start a device-code flow. Usually a bad
    /// client registration or scope list, so retrying will not help.
    #[error("could not initiate device-code flow: {0}")]
    FlowInitiationFailed(String),

    /// The device-code challenge expired or the user declined.
    #[error("interactive authentication failed: {0}")]
    InteractiveAuthFailed(String),

    /// Silent acquisition hit a transient failure (network, provider
    /// outage) before the interactive path was warranted. The cache is
    /// left intact for a later attempt.
    #[error("silent token acquisition failed: {0}")]
    SilentAcquisitionFailed(String),
}

/// Errors from authenticated Graph requests.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No access token could be acquired; the request was never sent.
    #[error("not authenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    /// Graph answered with a non-success status. The raw body is kept for
    /// diagnostics.
    #[error("Graph API error: HTTP {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body as returned by Graph.
        body: String,
    },

    /// Transport-level failure: connection refused, timeout, TLS.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Graph returned a 2xx with a body that did not parse.
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GraphError {
    /// HTTP status of an API-level failure, if that is what this is.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
