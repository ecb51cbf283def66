//! `GraphMail` - MCP server exposing Microsoft Outlook mail via the
//! Graph API, with device-code OAuth and an on-disk token cache.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod format;
mod server;

use std::sync::Arc;

use anyhow::Context;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use graphmail_core::{AuthSession, GraphClient, TokenStore};
use graphmail_oauth::{OAuthClient, Provider};

use config::Config;
use server::GraphMailServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP transport; everything we log goes to stderr.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphmail=info,graphmail_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env().context("startup configuration is incomplete")?;

    let provider = Provider::microsoft(&config.tenant_id)
        .with_context(|| format!("invalid tenant id {:?}", config.tenant_id))?;
    let oauth = OAuthClient::new(&config.client_id, provider)
        .with_client_secret(&config.client_secret)
        .with_redirect_uri(&config.redirect_uri);
    let session = Arc::new(AuthSession::new(
        oauth,
        TokenStore::new(&config.cache_path),
        Config::scopes(),
    ));
    let graph = GraphClient::new(session).context("invalid Graph base URL")?;

    info!(
        tenant = %config.tenant_id,
        cache = %config.cache_path,
        "starting GraphMail MCP server on stdio"
    );

    let service = GraphMailServer::new(Arc::new(graph))
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .context("could not start MCP server")?;

    // Runs until the client disconnects (EOF on stdin). Dropping the
    // service aborts any in-flight device-code poll.
    service.waiting().await?;
    Ok(())
}
