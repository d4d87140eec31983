//! postgate-mcp - MCP stdio server for the LinkedIn post queue
//!
//! Launched by an MCP client. stdout carries the protocol, so all logging
//! goes to stderr.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use postgate_core::{Dispatcher, LinkedInPublisher, PublisherConfig, QueueStore};
use postgate_mcp::{McpServer, PostgateHandler};

fn log_filter() -> tracing_subscriber::EnvFilter {
    let level = if let Ok(v) = std::env::var("RUST_LOG") {
        v
    } else if let Ok(v) = std::env::var("POSTGATE_LOG_LEVEL") {
        match v.as_str() {
            "silent" => "off".to_string(),
            "fatal" => "error".to_string(),
            other => other.to_string(),
        }
    } else {
        "warn".to_string()
    };

    tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; real env vars still apply
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = PublisherConfig::from_env();
    info!(
        linkedin_version = %config.linkedin_version,
        api_base = %config.api_base,
        "Publisher configured"
    );

    let store = Arc::new(QueueStore::new());
    let publisher = Arc::new(LinkedInPublisher::new(config));
    let dispatcher = Dispatcher::new(store, publisher);

    let mut server = McpServer::new(PostgateHandler::new(dispatcher));
    server.run().await?;
    Ok(())
}
