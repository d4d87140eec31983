//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC from a reader (stdin in production) and
//! writes one response line per request. Requests are handled one at a time.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::protocol::{self, Request, RequestId, Response, RpcError};
use crate::tools::{self, ToolResult};

const SERVER_NAME: &str = "postgate";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool handler trait
///
/// Implement this trait to handle tool calls.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, name: &str, arguments: Value) -> ToolResult;
}

/// MCP Server
pub struct McpServer<H: ToolHandler> {
    handler: Arc<H>,
    initialized: bool,
}

impl<H: ToolHandler> McpServer<H> {
    pub fn new(handler: H) -> Self {
        McpServer {
            handler: Arc::new(handler),
            initialized: false,
        }
    }

    /// Run the server on stdio
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!("Starting MCP server on stdio");
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with(stdin, stdout).await
    }

    /// Serve until the reader hits EOF
    pub async fn run_with<R, W>(&mut self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let message = line.trim();
            if message.is_empty() {
                continue;
            }

            debug!("Received: {}", message);

            let Some(response) = self.handle_message(message).await else {
                continue;
            };
            let response_json = protocol::serialize_response_string(&response)?;

            debug!("Sending: {}", response_json);

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Handle one line; `None` for notifications
    async fn handle_message(&mut self, message: &str) -> Option<Response> {
        match protocol::parse_request_str(message) {
            Ok(request) if request.is_notification() => {
                debug!(method = %request.method, "Notification received");
                None
            }
            Ok(request) => Some(self.handle_request(request).await),
            Err(err) => {
                warn!(error = %err, "Rejected malformed message");
                Some(Response::from_error(RequestId::Null, err))
            }
        }
    }

    async fn handle_request(&mut self, request: Request) -> Response {
        let id = request.id.clone().unwrap_or_default();
        let method = request.method.as_str();
        let params = request.params.unwrap_or(Value::Null);

        match method {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params).await,
            "ping" => Response::success(id, json!({})),
            _ => {
                warn!("Unknown method: {}", method);
                Response::from_error(id, RpcError::MethodNotFound(method.to_string()))
            }
        }
    }

    fn handle_initialize(&mut self, id: RequestId) -> Response {
        self.initialized = true;
        info!("MCP server initialized");

        Response::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION,
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: RequestId) -> Response {
        Response::success(id, json!({ "tools": tools::all_tools() }))
    }

    async fn handle_tools_call(&self, id: RequestId, params: Value) -> Response {
        let name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n.to_string(),
            None => {
                return Response::from_error(
                    id,
                    RpcError::InvalidParams("Missing 'name' field".to_string()),
                );
            }
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(Value::Object(serde_json::Map::new()));

        debug!("Calling tool: {} with args: {:?}", name, arguments);

        if tools::get_tool(&name).is_none() {
            return Response::from_error(
                id,
                RpcError::InvalidParams(format!("Unknown tool: {}", name)),
            );
        }

        let result = self.handler.call(&name, arguments).await;

        match serde_json::to_value(result) {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::from_error(id, RpcError::InternalError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait::async_trait]
    impl ToolHandler for EchoHandler {
        async fn call(&self, name: &str, arguments: Value) -> ToolResult {
            ToolResult::json_pretty(&json!({ "tool": name, "arguments": arguments }))
        }
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let mut server = McpServer::new(EchoHandler);
        let response = server
            .handle_request(Request::new(RequestId::Number(1), "initialize", Some(json!({}))))
            .await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "postgate");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(server.initialized);
    }

    #[tokio::test]
    async fn test_handle_tools_list() {
        let server = McpServer::new(EchoHandler);
        let response = server.handle_tools_list(RequestId::Number(1));

        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_handle_tools_call_passes_arguments() {
        let server = McpServer::new(EchoHandler);
        let params = json!({ "name": "approve_post", "arguments": { "id": "post_1" } });

        let response = server.handle_tools_call(RequestId::Number(7), params).await;
        assert_eq!(response.id, RequestId::Number(7));
        let text = response.result.unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        let echoed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(echoed["tool"], "approve_post");
        assert_eq!(echoed["arguments"]["id"], "post_1");
    }

    #[tokio::test]
    async fn test_handle_tools_call_rejects_unknown_tool() {
        let server = McpServer::new(EchoHandler);
        let response = server
            .handle_tools_call(RequestId::Number(1), json!({ "name": "delete_post" }))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);

        let missing_name = server.handle_tools_call(RequestId::Number(2), json!({})).await;
        assert_eq!(missing_name.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let mut server = McpServer::new(EchoHandler);
        let response = server
            .handle_request(Request::new(RequestId::Number(1), "resources/list", None))
            .await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_run_with_scripted_session() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#, "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
            "\n",
            "this is not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#, "\n",
            r#"{"jsonrpc":"2.0","method":"ping"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"notifications/initialized"}"#, "\n",
        );
        let mut output = Vec::new();

        let mut server = McpServer::new(EchoHandler);
        server.run_with(input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        // The id-less ping is a notification and gets nothing back
        assert_eq!(responses.len(), 5);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], -32700);
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"], json!({}));
        assert_eq!(responses[3]["id"], Value::Null);
        assert_eq!(responses[3]["result"], json!({}));
        assert_eq!(responses[4]["id"], 3);
        assert_eq!(responses[4]["error"]["code"], -32601);
    }
}
