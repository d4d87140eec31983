//! Bridges MCP tool calls to the post workflow dispatcher

use postgate_core::{CoreError, Dispatcher};
use serde_json::Value;
use tracing::{error, warn};

use crate::server::ToolHandler;
use crate::tools::ToolResult;

/// Tool handler backed by a [`Dispatcher`]
pub struct PostgateHandler {
    dispatcher: Dispatcher,
}

impl PostgateHandler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait::async_trait]
impl ToolHandler for PostgateHandler {
    async fn call(&self, name: &str, arguments: Value) -> ToolResult {
        match self.dispatcher.call(name, arguments).await {
            Ok(output) => ToolResult::json_pretty(&output),
            Err(e @ CoreError::UnknownOperation(_)) => {
                error!(tool = %name, error = %e, "Tool call failed");
                ToolResult::error(e.to_string())
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool call rejected");
                ToolResult::error(e.to_string())
            }
        }
    }
}
