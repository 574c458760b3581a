//! The search/extraction capability the MCP adapters are written against.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExtractOptions, ExtractResponse, SearchOptions, SearchResponse};

/// A web search and content extraction backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Search the web for `query`.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse>;

    /// Extract page content from `urls`. Per-URL failures are reported in
    /// [`ExtractResponse::failed_results`]; `Err` means the whole call failed.
    async fn extract(&self, urls: &[String], options: &ExtractOptions) -> Result<ExtractResponse>;
}
