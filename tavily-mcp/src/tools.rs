//! Search and extract adapters: typed request in, provider call, normalized
//! [`ToolResponse`] out.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tavily::{ExtractOptions, ExtractResponse, Provider, SearchOptions, SearchResponse};

use crate::error::{RegistryError, ToolError};
use crate::registry::{ToolHandler, ToolRegistry};
use crate::response::{ContentItem, ToolResponse};
use crate::schema::{FieldError, FieldErrorKind, ObjectSchema, Schema, ValidationError};

/// Upper bound on URLs per extract call, enforced by the provider.
pub const MAX_EXTRACT_URLS: usize = 20;

/// Name of the extract tool.
pub const EXTRACT: &str = "extract";

/// Name and description under which the search adapter is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchVariant {
    /// Tool name.
    pub name: &'static str,
    /// Description clients use to choose between variants.
    pub description: &'static str,
}

/// The three entry points sharing one search adapter.
pub const SEARCH_VARIANTS: [SearchVariant; 3] = [
    SearchVariant {
        name: "search",
        description: "Perform a basic web search. Returns search results including title, content and URL.",
    },
    SearchVariant {
        name: "searchContext",
        description: "Perform a context-aware web search. Optimized for retrieving contextually relevant results.",
    },
    SearchVariant {
        name: "searchQNA",
        description: "Perform a question-answering search. Best suited for direct questions that need specific answers.",
    },
];

/// Description of the extract tool.
const EXTRACT_DESCRIPTION: &str =
    "Extract and process content from a list of URLs. Can handle up to 20 URLs at once.";

/// Accepted `searchDepth` values.
const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];
/// Accepted `topic` values.
const TOPICS: &[&str] = &["general", "news", "finance"];
/// Accepted `timeRange` values, long and short forms.
const TIME_RANGES: &[&str] = &["year", "month", "week", "day", "y", "m", "w", "d"];
/// Accepted `extractDepth` values.
const EXTRACT_DEPTHS: &[&str] = &["basic", "advanced"];

/// Arguments of the search tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRequest {
    /// Search query.
    pub query: String,
    /// Optional configuration.
    #[serde(default)]
    pub options: Option<SearchOptions>,
}

/// Arguments of the extract tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractRequest {
    /// URLs to extract.
    pub urls: Vec<String>,
    /// Optional configuration.
    #[serde(default)]
    pub options: Option<ExtractOptions>,
}

/// Input schema shared by all search variants.
pub fn search_schema() -> ObjectSchema {
    let domains = || Schema::array(Schema::string(), None, None);
    let options = ObjectSchema::new()
        .describe("Search configuration options, all fields are optional")
        .optional(
            "searchDepth",
            "Search depth: basic (simple search) or advanced (in-depth search)",
            Schema::Enum(SEARCH_DEPTHS),
        )
        .optional(
            "topic",
            "Search topic: general (all topics), news (news only), finance (financial content)",
            Schema::Enum(TOPICS),
        )
        .optional(
            "days",
            "Limit search to recent days, e.g.: 7 for last 7 days",
            Schema::positive_integer(),
        )
        .optional(
            "maxResults",
            "Maximum number of results to return, e.g.: 10 for 10 results",
            Schema::positive_integer(),
        )
        .optional(
            "includeImages",
            "Include images in results: true or false",
            Schema::Boolean,
        )
        .optional(
            "includeImageDescriptions",
            "Include image descriptions: true or false",
            Schema::Boolean,
        )
        .optional(
            "includeAnswer",
            "Include AI-generated answer summary: true or false",
            Schema::Boolean,
        )
        .optional(
            "includeRawContent",
            "Include raw webpage content: true or false",
            Schema::Boolean,
        )
        .optional(
            "includeDomains",
            "Only search within these domains, e.g.: ['example.com', 'test.com']",
            domains(),
        )
        .optional(
            "excludeDomains",
            "Exclude these domains from search, e.g.: ['example.com', 'test.com']",
            domains(),
        )
        .optional(
            "maxTokens",
            "Maximum number of tokens in response, e.g.: 1000",
            Schema::positive_integer(),
        )
        .optional(
            "timeRange",
            "Time range: year/y (within 1 year), month/m (within 1 month), week/w (within 1 week), day/d (within 1 day)",
            Schema::Enum(TIME_RANGES),
        );

    ObjectSchema::new()
        .required(
            "query",
            "Enter your search query or question",
            Schema::non_empty_string(),
        )
        .optional(
            "options",
            "Search configuration options, all fields are optional",
            Schema::Object(options),
        )
}

/// Input schema of the extract tool.
pub fn extract_schema() -> ObjectSchema {
    let options = ObjectSchema::new()
        .describe("Content extraction configuration options, all fields are optional")
        .optional(
            "extractDepth",
            "Extraction depth: basic (simple extraction) or advanced (detailed extraction)",
            Schema::Enum(EXTRACT_DEPTHS),
        )
        .optional(
            "includeImages",
            "Include images in extraction: true or false",
            Schema::Boolean,
        );

    ObjectSchema::new()
        .required(
            "urls",
            "List of URLs to extract content from (max 20). e.g.: ['https://example.com', 'https://test.com']",
            Schema::array(Schema::non_empty_string(), Some(1), Some(MAX_EXTRACT_URLS)),
        )
        .optional(
            "options",
            "Content extraction configuration options, all fields are optional",
            Schema::Object(options),
        )
}

/// Decode validated arguments into a typed request.
fn decode<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| {
        ValidationError(vec![FieldError::new(
            "",
            FieldErrorKind::Invalid(e.to_string()),
        )])
        .into()
    })
}

/// Render search results, one item per result in provider order.
pub fn render_search(response: &SearchResponse) -> ToolResponse {
    let content = response
        .results
        .iter()
        .map(|r| ContentItem::text(format!("{}\n{}\nURL: {}\n\n", r.title, r.content, r.url)))
        .collect();
    ToolResponse::new(content)
}

/// Render extraction results, followed by one summary item when any URL failed.
pub fn render_extract(response: &ExtractResponse) -> ToolResponse {
    let mut content: Vec<ContentItem> = response
        .results
        .iter()
        .map(|r| ContentItem::text(format!("URL: {}\n内容: {}\n\n", r.url, r.raw_content)))
        .collect();

    if !response.failed_results.is_empty() {
        let failed = response
            .failed_results
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        content.push(ContentItem::text(format!(
            "\nFailed to extract from URLs:\n{failed}"
        )));
    }

    ToolResponse::new(content)
}

/// Web search adapter. One instance backs each [`SearchVariant`].
#[derive(Clone)]
pub struct SearchTool {
    /// Backend performing the search.
    provider: Arc<dyn Provider>,
}

impl SearchTool {
    /// Create an adapter over `provider`.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Forward `request` to the provider and render the results.
    pub async fn run(&self, request: &SearchRequest) -> Result<ToolResponse, ToolError> {
        let options = request.options.clone().unwrap_or_default();
        let response = self
            .provider
            .search(&request.query, &options)
            .await
            .map_err(ToolError::SearchFailed)?;
        Ok(render_search(&response))
    }
}

impl fmt::Debug for SearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTool").finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHandler for SearchTool {
    async fn call(&self, input: Value) -> Result<ToolResponse, ToolError> {
        let request: SearchRequest = decode(input)?;
        self.run(&request).await
    }
}

/// Content extraction adapter.
#[derive(Clone)]
pub struct ExtractTool {
    /// Backend performing the extraction.
    provider: Arc<dyn Provider>,
}

impl ExtractTool {
    /// Create an adapter over `provider`.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Forward `request` to the provider and render the results.
    pub async fn run(&self, request: &ExtractRequest) -> Result<ToolResponse, ToolError> {
        let options = request.options.unwrap_or_default();
        let response = self
            .provider
            .extract(&request.urls, &options)
            .await
            .map_err(ToolError::ExtractFailed)?;
        Ok(render_extract(&response))
    }
}

impl fmt::Debug for ExtractTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractTool").finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHandler for ExtractTool {
    async fn call(&self, input: Value) -> Result<ToolResponse, ToolError> {
        let request: ExtractRequest = decode(input)?;
        self.run(&request).await
    }
}

/// Register one search adapter under `variant`'s name and description.
pub fn register_search(
    registry: &mut ToolRegistry,
    variant: SearchVariant,
    provider: &Arc<dyn Provider>,
) -> Result<(), RegistryError> {
    registry.register(
        variant.name,
        variant.description,
        search_schema(),
        Arc::new(SearchTool::new(Arc::clone(provider))),
    )
}

/// Register the full tool surface: the search variants, then `extract`.
pub fn register_all(
    registry: &mut ToolRegistry,
    provider: &Arc<dyn Provider>,
) -> Result<(), RegistryError> {
    for variant in SEARCH_VARIANTS {
        register_search(registry, variant, provider)?;
    }
    registry.register(
        EXTRACT,
        EXTRACT_DESCRIPTION,
        extract_schema(),
        Arc::new(ExtractTool::new(Arc::clone(provider))),
    )
}
