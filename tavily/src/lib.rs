//! Tavily - web search and content extraction client
//!
//! An async client for the [Tavily](https://tavily.com/) REST API together
//! with the [`Provider`] seam the MCP server is written against.
//!
//! ## Features
//!
//! - `search`: ranked web results with optional answer and images
//! - `extract`: raw page content for up to 20 URLs, with per-URL failures
//! - Bearer authentication, request deadline, typed error taxonomy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tavily::{Client, ClientConfig, Provider, SearchOptions};
//!
//! # async fn example() -> tavily::Result<()> {
//! let client = Client::new(ClientConfig::new("tvly-your-key")?)?;
//! let response = client.search("capital of France", &SearchOptions::default()).await?;
//! for result in response.results {
//!     println!("{} - {}", result.title, result.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{Client, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Result, TavilyError};
pub use provider::Provider;
pub use types::{
    ExtractDepth, ExtractOptions, ExtractResponse, ExtractResult, FailedResult, SearchDepth,
    SearchImage, SearchOptions, SearchResponse, SearchResult, TimeRange, Topic,
};
