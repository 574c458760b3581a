//! HTTP client for the Tavily REST API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, TavilyError};
use crate::provider::Provider;
use crate::types::{ExtractOptions, ExtractResponse, SearchOptions, SearchResponse};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Deadline applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`Client`].
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token.
    api_key: String,
    /// Base URL, without trailing slash.
    base_url: String,
    /// Per-request deadline.
    timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the production endpoint.
    ///
    /// Fails if `api_key` is empty or whitespace.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TavilyError::Config("API key is empty".to_string()));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Point the client at another endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-request deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured per-request deadline.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body of a `/search` request.
#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    /// Search query.
    query: &'a str,
    /// Options, flattened into the top-level object.
    #[serde(flatten)]
    options: &'a SearchOptions,
}

/// Body of an `/extract` request.
#[derive(Debug, Serialize)]
struct ExtractBody<'a> {
    /// URLs to extract.
    urls: &'a [String],
    /// Options, flattened into the top-level object.
    #[serde(flatten)]
    options: &'a ExtractOptions,
}

/// Async Tavily API client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    /// Pooled HTTP client carrying the auth header and deadline.
    http: reqwest::Client,
    /// Endpoint settings.
    config: ClientConfig,
}

impl Client {
    /// Build a client from `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| TavilyError::Config("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(concat!("tavily-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TavilyError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.config.base_url);
        debug!(url = %url, "POST request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(TavilyError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(TavilyError::from_transport)?;
            debug!(status = status.as_u16(), "request rejected");
            return Err(TavilyError::from_response(status.as_u16(), &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(TavilyError::from_transport)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Provider for Client {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let response: SearchResponse = self.post("search", &SearchBody { query, options }).await?;
        debug!(query, results = response.results.len(), "search completed");
        Ok(response)
    }

    async fn extract(&self, urls: &[String], options: &ExtractOptions) -> Result<ExtractResponse> {
        let response: ExtractResponse = self.post("extract", &ExtractBody { urls, options }).await?;
        debug!(
            extracted = response.results.len(),
            failed = response.failed_results.len(),
            "extract completed"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::{ExtractDepth, SearchDepth, Topic};

    fn test_client(uri: &str) -> Client {
        let config = ClientConfig::new("tvly-test").unwrap().with_base_url(uri);
        Client::new(config).unwrap()
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(matches!(
            ClientConfig::new("   "),
            Err(TavilyError::Config(_))
        ));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = ClientConfig::new("tvly-secret").unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("tvly-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url(), "http://localhost:9000");
    }

    #[tokio::test]
    async fn search_sends_bearer_auth_and_snake_case_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_json(json!({
                "query": "rust async",
                "search_depth": "advanced",
                "topic": "news",
                "max_results": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "rust async",
                "results": [
                    {"title": "Tokio", "url": "https://tokio.rs", "content": "Runtime", "score": 0.9},
                    {"title": "Async book", "url": "https://rust-lang.github.io/async-book", "content": "Guide", "score": 0.8}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let options = SearchOptions {
            search_depth: Some(SearchDepth::Advanced),
            topic: Some(Topic::News),
            max_results: Some(3),
            ..SearchOptions::default()
        };
        let response = test_client(&mock_server.uri())
            .search("rust async", &options)
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].title, "Tokio");
        assert_eq!(response.results[1].url, "https://rust-lang.github.io/async-book");
    }

    #[tokio::test]
    async fn extract_returns_results_and_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/extract"))
            .and(body_json(json!({
                "urls": ["https://a.com", "https://bad"],
                "extract_depth": "basic"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"url": "https://a.com", "raw_content": "hello"}],
                "failed_results": [{"url": "https://bad", "error": "timeout"}],
                "response_time": 0.4
            })))
            .mount(&mock_server)
            .await;

        let urls = vec!["https://a.com".to_string(), "https://bad".to_string()];
        let options = ExtractOptions {
            extract_depth: Some(ExtractDepth::Basic),
            include_images: None,
        };
        let response = test_client(&mock_server.uri())
            .extract(&urls, &options)
            .await
            .unwrap();

        assert_eq!(response.results[0].raw_content, "hello");
        assert_eq!(response.failed_results[0].to_string(), "https://bad: timeout");
    }

    #[tokio::test]
    async fn unauthorized_is_an_authentication_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": {"error": "Unauthorized: missing or invalid API key."}
            })))
            .mount(&mock_server)
            .await;

        let err = test_client(&mock_server.uri())
            .search("q", &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TavilyError::Authentication(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = test_client(&mock_server.uri())
            .search("q", &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TavilyError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_response_hits_the_deadline() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new("tvly-test")
            .unwrap()
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(50));
        let err = Client::new(config)
            .unwrap()
            .search("q", &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    /// Answer one request with a 500 whose body stops short of its length.
    fn serve_truncated_error() -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            stream
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 64\r\n\r\npartial")
                .unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn unreadable_error_body_is_a_transport_error() {
        let err = test_client(&serve_truncated_error())
            .search("q", &SearchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TavilyError::Http(_)), "got {err:?}");
    }
}
