//! mcp-quickchart server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use quickchart_client::{Endpoint, Endpoints, FetchConfig, QuickChartClient};
use quickchart_core::{AppConfig, OutputLocator};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod pipeline;
mod registry;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let endpoints = Endpoints::from_config(&config).context("invalid QuickChart endpoint configuration")?;
    let backend = QuickChartClient::new(FetchConfig::from(&config)).context("failed to build HTTP client")?;
    let output = OutputLocator::from_config(&config);

    let registry = registry::ToolRegistry::new(&config);
    tracing::info!(
        chart_url = %endpoints.url(Endpoint::Chart),
        tools = registry.names().len(),
        "Starting mcp-quickchart server on stdio transport"
    );

    let ctx = pipeline::ToolContext { endpoints, backend: Arc::new(backend), output };
    let handler = handler::QuickChartServer::new(registry, ctx);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
