//! MCP server implementation for Tavily.
//!
//! `tools/list` and `tools/call` are answered from the [`ToolRegistry`]
//! rather than a compile-time tool router, so every tool is validated and
//! dispatched the same way. Unknown tools and invalid arguments become
//! protocol errors; provider failures become tool results flagged
//! `is_error` so the calling model sees the cause.
//!
//! [`ToolRegistry`]: crate::registry::ToolRegistry

use std::sync::Arc;

use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, ErrorCode, Implementation,
        InitializeResult, ListToolsResult, PaginatedRequestParams, ProtocolVersion,
        ServerCapabilities, Tool,
    },
    service::RequestContext,
};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::context::AppContext;
use crate::error::ToolError;
use crate::registry::ToolDefinition;
use crate::response::{ContentItem, ToolResponse};

/// Type alias for ServerInfo (same as InitializeResult).
type ServerInfo = InitializeResult;

/// Tavily MCP server exposing the search and extract tools.
#[derive(Clone, Debug)]
pub struct TavilyMcpServer {
    /// Shared application context.
    context: Arc<AppContext>,
}

impl TavilyMcpServer {
    /// Create a server over `context`.
    #[must_use]
    pub fn new(context: AppContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    /// Registered tools as MCP tool descriptors.
    pub fn tools(&self) -> Vec<Tool> {
        self.context.registry().definitions().map(to_mcp_tool).collect()
    }

    /// Run a tool and convert the outcome to MCP types.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = Value::Object(arguments.unwrap_or_default());
        match self.context.dispatch(name, input).await {
            Ok(response) => Ok(to_call_result(response)),
            Err(err @ (ToolError::SearchFailed(_) | ToolError::ExtractFailed(_))) => {
                Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
            }
            Err(err) => Err(to_mcp_error(err)),
        }
    }
}

/// Convert a registry definition to an MCP tool descriptor.
fn to_mcp_tool(definition: &ToolDefinition) -> Tool {
    Tool::new(
        definition.name().to_string(),
        definition.description().to_string(),
        Arc::new(definition.input_schema().to_json_object()),
    )
}

/// Convert a normalized response to an MCP result.
fn to_call_result(response: ToolResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text { text } => Content::text(text),
        })
        .collect();
    CallToolResult::success(content)
}

/// Convert a rejected call to an MCP protocol error.
fn to_mcp_error(err: ToolError) -> ErrorData {
    let message = err.to_string();
    match err {
        ToolError::NotFound(_) => ErrorData::new(ErrorCode::METHOD_NOT_FOUND, message, None),
        ToolError::Validation(validation) => {
            let details: Vec<Value> = validation
                .errors()
                .iter()
                .map(|e| json!({ "path": e.path, "message": e.to_string() }))
                .collect();
            ErrorData::invalid_params(message, Some(json!({ "errors": details })))
        }
        ToolError::SearchFailed(_) | ToolError::ExtractFailed(_) => {
            ErrorData::internal_error(message, None)
        }
    }
}

impl ServerHandler for TavilyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tavily".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tavily Search. Web search and content extraction. \
                 Use 'search', 'searchContext' or 'searchQNA' to find pages, \
                 'extract' to fetch the content of up to 20 URLs."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = %request.name, "tool call");
        self.invoke(&request.name, request.arguments).await
    }
}
