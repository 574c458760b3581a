//! Error types for the MCP server.

use tavily::TavilyError;

use crate::schema::ValidationError;

/// Startup failures. The process must not serve when one of these occurs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No credential was supplied.
    #[error("TAVILY_API_KEY is not set; export it or pass --api-key")]
    MissingApiKey,

    /// The provider client rejected its configuration.
    #[error("invalid provider client configuration: {0}")]
    Client(#[from] TavilyError),

    /// The tool set could not be assembled.
    #[error("invalid tool set: {0}")]
    Registry(#[from] RegistryError),
}

/// Failures while building the tool registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A tool with this name already exists.
    #[error("tool already registered: {0}")]
    Duplicate(String),
}

/// Failures of a single tool invocation, returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The arguments do not match the tool's input schema.
    #[error("invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    /// The provider's search call failed.
    #[error("Search failed: {0}")]
    SearchFailed(#[source] TavilyError),

    /// The provider's extract call failed as a whole.
    #[error("Failed to extract content: {0}")]
    ExtractFailed(#[source] TavilyError),
}
