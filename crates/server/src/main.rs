//! viewtally server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use viewtally_core::{AppConfig, ArticleDb, ArticleService};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db_path = %config.db_path.display(),
        flush_threshold = config.flush_threshold.get(),
        cache_enabled = config.cache_enabled,
        "Starting viewtally server on stdio transport"
    );

    let db = ArticleDb::open(&config.db_path).await?;
    let service = ArticleService::from_config(Arc::new(db), &config);

    let handler = handler::ArticleServer::new(service);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
