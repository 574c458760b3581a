//! Error types for the Tavily client.

use serde_json::Value;

/// Result type for Tavily operations.
pub type Result<T> = std::result::Result<T, TavilyError>;

/// Errors raised while talking to the Tavily API.
#[derive(Debug, thiserror::Error)]
pub enum TavilyError {
    /// Transport-level failure (DNS, connect, TLS, broken body stream).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The API rejected the credential.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TavilyError {
    /// Classify a `reqwest` failure, keeping elapsed deadlines distinct.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Build an error from a non-success status and its body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = detail_message(body).unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });

        match status {
            401 | 403 => Self::Authentication(message),
            _ => Self::Api { status, message },
        }
    }

    /// Whether the failure is an elapsed deadline.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Pull the human-readable message out of `{"detail": {"error": ...}}`,
/// `{"detail": "..."}` or `{"error": "..."}` bodies.
fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").unwrap_or(&value);
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("error")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = TavilyError::from_response(
            401,
            r#"{"detail": {"error": "Unauthorized: missing or invalid API key."}}"#,
        );
        assert!(matches!(
            err,
            TavilyError::Authentication(ref m) if m == "Unauthorized: missing or invalid API key."
        ));
    }

    #[test]
    fn plain_detail_string() {
        let err = TavilyError::from_response(432, r#"{"detail": "plan limit exceeded"}"#);
        assert_eq!(
            err.to_string(),
            "API error (status 432): plan limit exceeded"
        );
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let err = TavilyError::from_response(502, "  Bad Gateway\n");
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = TavilyError::from_response(500, "");
        assert_eq!(err.to_string(), "API error (status 500): HTTP 500");
    }
}
