//! Tavily MCP Server - Model Context Protocol server for Tavily web search.
//!
//! This crate exposes Tavily's search and content extraction API to AI
//! assistants as MCP tools. Tool arguments are validated against a
//! structural schema, forwarded to the provider, and the provider's results
//! are normalized into text content.
//!
//! ## Features
//!
//! - **Tools**: search, searchContext, searchQNA, extract
//! - **Transports**: stdio (local) and HTTP (remote)
//!
//! ## Usage
//!
//! ```bash
//! # Start with stdio transport (default)
//! TAVILY_API_KEY=tvly-... tavily-mcp
//!
//! # Start with HTTP transport
//! tavily-mcp --transport http --bind 127.0.0.1:8080
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod response;
pub mod schema;
pub mod server;
pub mod tools;

pub use config::Config;
pub use context::AppContext;
pub use error::{ConfigError, RegistryError, ToolError};
pub use registry::{ToolDefinition, ToolHandler, ToolRegistry};
pub use response::{ContentItem, ToolResponse};
pub use schema::{FieldError, FieldErrorKind, ObjectSchema, Schema, ValidationError};
pub use server::TavilyMcpServer;
