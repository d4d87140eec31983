//! MCP (Model Context Protocol) server for postgate
//!
//! Exposes the post queue over JSON-RPC 2.0 on stdio:
//!
//! - `health`: credentials present, API version, queue length
//! - `queue_post`: add a post awaiting approval
//! - `list_queue`: every post in queue order
//! - `approve_post`: open the approval gate
//! - `publish_post`: send an approved post to LinkedIn
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use postgate_core::{Dispatcher, LinkedInPublisher, PublisherConfig, QueueStore};
//! use postgate_mcp::{McpServer, PostgateHandler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let publisher = Arc::new(LinkedInPublisher::new(PublisherConfig::from_env()));
//!     let dispatcher = Dispatcher::new(Arc::new(QueueStore::new()), publisher);
//!     let mut server = McpServer::new(PostgateHandler::new(dispatcher));
//!     server.run().await
//! }
//! ```

pub mod handler;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handler::PostgateHandler;
pub use protocol::{Request, RequestId, Response, RpcError};
pub use server::{McpServer, ToolHandler};
pub use tools::{all_tools, get_tool, ToolContent, ToolDefinition, ToolResult};
