//! MCP server surface: the three Outlook tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData, ServerHandler, schemars, tool, tool_handler, tool_router};
use serde::Deserialize;

use graphmail_core::{GraphClient, MessageQuery};

use crate::format;

/// Default page size for `list_emails`.
const DEFAULT_LIMIT: u32 = 10;
/// Largest page `list_emails` will request.
const MAX_LIMIT: u32 = 50;

/// Arguments for the `list_emails` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEmailsRequest {
    /// Folder name (default: Inbox).
    #[schemars(description = "Folder name (default: Inbox)")]
    pub folder: Option<String>,
    /// Maximum number of emails to return, 1-50 (default: 10).
    #[schemars(description = "Maximum number of emails to return (default: 10)")]
    pub limit: Option<u32>,
    /// OData filter query, e.g. `isRead eq false`.
    #[schemars(description = "OData filter query (e.g., 'isRead eq false')")]
    pub filter: Option<String>,
    /// Search query to find specific emails.
    #[schemars(description = "Search query to find specific emails")]
    pub search: Option<String>,
}

/// Arguments for the `read_email` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadEmailRequest {
    /// The ID of the email to read.
    #[schemars(description = "The ID of the email to read")]
    pub email_id: String,
}

/// MCP server for Outlook mail over Microsoft Graph.
///
/// Failures come back as tool-level error text; no tool call crashes the
/// process or ends the session.
#[derive(Clone)]
pub struct GraphMailServer {
    graph: Arc<GraphClient>,
    tool_router: ToolRouter<Self>,
}

fn failure(context: &str, err: &graphmail_core::GraphError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{context}: {err}"))])
}

#[tool_router]
impl GraphMailServer {
    /// Creates the server around a shared Graph client.
    #[must_use]
    pub fn new(graph: Arc<GraphClient>) -> Self {
        Self {
            graph,
            tool_router: Self::tool_router(),
        }
    }

    /// Tool: list emails from the inbox or a named folder.
    #[tool(
        name = "list_emails",
        description = "List emails from Outlook inbox or specified folder"
    )]
    async fn list_emails(
        &self,
        Parameters(request): Parameters<ListEmailsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let mut query = MessageQuery::new().top(limit);
        if let Some(filter) = request.filter {
            query = query.filter(filter);
        }
        if let Some(search) = request.search {
            query = query.search(search);
        }

        match self
            .graph
            .list_messages(request.folder.as_deref(), &query)
            .await
        {
            Ok(messages) => Ok(CallToolResult::success(vec![Content::text(
                format::message_list(&messages),
            )])),
            Err(err) => Ok(failure("Failed to retrieve emails", &err)),
        }
    }

    /// Tool: read a single email by its Graph id.
    #[tool(name = "read_email", description = "Read a specific email by ID")]
    async fn read_email(
        &self,
        Parameters(request): Parameters<ReadEmailRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.graph.get_message(&request.email_id).await {
            Ok(message) => Ok(CallToolResult::success(vec![Content::text(
                format::message_detail(&message),
            )])),
            Err(err) => Ok(failure(
                &format!("Failed to retrieve email with ID {}", request.email_id),
                &err,
            )),
        }
    }

    /// Tool: list all mail folders with unread and total counts.
    #[tool(name = "get_folders", description = "List all email folders")]
    async fn get_folders(&self) -> Result<CallToolResult, ErrorData> {
        match self.graph.list_folders().await {
            Ok(folders) => Ok(CallToolResult::success(vec![Content::text(
                format::folder_list(&folders),
            )])),
            Err(err) => Ok(failure("Failed to retrieve folders", &err)),
        }
    }
}

#[tool_handler]
impl ServerHandler for GraphMailServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Outlook mail access over Microsoft Graph. Use list_emails to browse a folder, \
                 read_email for a full message, and get_folders for the folder tree. The first \
                 call triggers a device-code sign-in; watch the server log for the code."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
