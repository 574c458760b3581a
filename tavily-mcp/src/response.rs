//! Uniform output envelope returned by every tool.

use serde::{Deserialize, Serialize};

/// One unit of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    /// Plain text.
    Text {
        /// The text body.
        text: String,
    },
}

impl ContentItem {
    /// Create a text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Text body of the item.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Ordered output of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Items in display order.
    pub content: Vec<ContentItem>,
}

impl ToolResponse {
    /// Wrap `content` as a response.
    pub const fn new(content: Vec<ContentItem>) -> Self {
        Self { content }
    }
}
