//! Tavily MCP Server - Entry point.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt;
use rmcp::transport::StreamableHttpServerConfig;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, tower::StreamableHttpService,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tavily_mcp::{AppContext, Config, TavilyMcpServer};

/// Transport the server listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// MCP frames over stdin/stdout.
    Stdio,
    /// Streamable HTTP under `/mcp`.
    Http,
}

/// Tavily MCP Server - Model Context Protocol server for Tavily web search.
#[derive(Parser, Debug)]
#[command(name = "tavily-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tavily API key.
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tavily API endpoint.
    #[arg(long, env = "TAVILY_BASE_URL")]
    base_url: Option<String>,

    /// Deadline for each provider request, in seconds.
    #[arg(
        long,
        env = "TAVILY_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Transport to serve on.
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Listen address for the HTTP transport.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging to stderr (stdout is used for MCP communication)
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config {
        api_key: args.api_key,
        base_url: args.base_url,
        timeout: Some(Duration::from_secs(args.timeout_secs)),
    };

    // Fails on a missing credential before any tool is registered
    let context = AppContext::from_config(&config)?;
    let server = TavilyMcpServer::new(context);

    match args.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, args.bind).await,
    }
}

/// Serve over stdin/stdout until the client disconnects.
async fn serve_stdio(server: TavilyMcpServer) -> Result<()> {
    tracing::info!("Starting Tavily MCP server with stdio transport");

    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

/// Serve streamable HTTP on `addr` until Ctrl-C.
async fn serve_http(server: TavilyMcpServer, addr: SocketAddr) -> Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Starting Tavily MCP server with HTTP transport");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Args::try_parse_from(["tavily-mcp", "--timeout-secs", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn positive_timeout_is_accepted() {
        let args = Args::try_parse_from(["tavily-mcp", "--timeout-secs", "5"]).unwrap();
        assert_eq!(args.timeout_secs, 5);
        assert_eq!(args.transport, Transport::Stdio);
    }
}
