//! Request options and response models.
//!
//! Option structs read the camelCase keys MCP clients send and write the
//! snake_case keys the Tavily API expects, so a validated tool input can be
//! forwarded to the provider unmodified.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much effort the provider spends on a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Simple search.
    Basic,
    /// In-depth search.
    Advanced,
}

/// Category the search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// All topics.
    General,
    /// News only.
    News,
    /// Financial content.
    Finance,
}

/// Publication window, long or short form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Within one year.
    Year,
    /// Within one month.
    Month,
    /// Within one week.
    Week,
    /// Within one day.
    Day,
    /// Short form of `year`.
    Y,
    /// Short form of `month`.
    M,
    /// Short form of `week`.
    W,
    /// Short form of `day`.
    D,
}

/// How much effort the provider spends on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractDepth {
    /// Simple extraction.
    Basic,
    /// Detailed extraction (tables, embedded content).
    Advanced,
}

/// Optional search configuration. Absent fields are left to provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "snake_case", deserialize = "camelCase"))]
pub struct SearchOptions {
    /// Search depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_depth: Option<SearchDepth>,
    /// Search topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    /// Limit to results from the last N days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Maximum number of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Include query-related images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
    /// Include a description for each image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_image_descriptions: Option<bool>,
    /// Include a generated answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_answer: Option<bool>,
    /// Include the cleaned page content of each result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_raw_content: Option<bool>,
    /// Only search within these domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    /// Never return results from these domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    /// Token budget for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Publication window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

/// Optional extraction configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "snake_case", deserialize = "camelCase"))]
pub struct ExtractOptions {
    /// Extraction depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_depth: Option<ExtractDepth>,
    /// Include images found on each page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
}

/// Body of a successful `/search` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query as understood by the provider.
    #[serde(default)]
    pub query: String,
    /// Generated answer, when requested.
    #[serde(default)]
    pub answer: Option<String>,
    /// Query-related images, when requested.
    #[serde(default)]
    pub images: Vec<SearchImage>,
    /// Ranked results, best first.
    pub results: Vec<SearchResult>,
}

/// An image returned by a search, bare or described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchImage {
    /// Image URL only.
    Url(String),
    /// Image URL with a generated description.
    Described {
        /// Image URL.
        url: String,
        /// Generated description.
        #[serde(default)]
        description: Option<String>,
    },
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Most query-relevant snippet of the page.
    pub content: String,
    /// Relevance score.
    #[serde(default)]
    pub score: f64,
    /// Cleaned page content, when requested.
    #[serde(default)]
    pub raw_content: Option<String>,
    /// Publication date, for news results.
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Body of a successful `/extract` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Pages that were extracted.
    pub results: Vec<ExtractResult>,
    /// URLs that could not be extracted.
    #[serde(default)]
    pub failed_results: Vec<FailedResult>,
}

/// Content extracted from one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Source URL.
    pub url: String,
    /// Extracted page content.
    #[serde(default)]
    pub raw_content: String,
    /// Images found on the page, when requested.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A URL the provider could not extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedResult {
    /// Source URL.
    pub url: String,
    /// Provider's reason.
    #[serde(default)]
    pub error: String,
}

impl fmt::Display for FailedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_empty() {
            f.write_str(&self.url)
        } else {
            write!(f, "{}: {}", self.url, self.error)
        }
    }
}
