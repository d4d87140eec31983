//! MCP tool catalogue
//!
//! Static descriptors of the five postgate tools and the result envelope
//! returned by `tools/call`.

use postgate_core::Operation;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool definition following MCP schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        ToolDefinition {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Tool result content type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Tool call result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        ToolResult {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    /// Pretty-printed JSON, the way every postgate tool answers
    pub fn json_pretty<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => ToolResult::text(text),
            Err(e) => ToolResult::error(format!("Failed to serialize result: {}", e)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ToolResult {
            content: vec![ToolContent::Text {
                text: json!({ "error": message.into() }).to_string(),
            }],
            is_error: Some(true),
        }
    }

    /// Text of the first content block
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

fn empty_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn post_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": "Post ID returned by queue_post" }
        },
        "required": ["id"]
    })
}

/// Generate all tool definitions
pub fn all_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "health",
            "Check server status and required env vars.",
            empty_schema(),
        ),
        ToolDefinition::new(
            "queue_post",
            "Queue a LinkedIn post for later publishing.",
            json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": postgate_core::MAX_TEXT_LEN,
                        "description": "Post body"
                    },
                    "whenIso": {
                        "type": "string",
                        "description": "Intended publish time (ISO 8601), informational only"
                    },
                    "visibility": {
                        "type": "string",
                        "enum": ["PUBLIC", "CONNECTIONS"],
                        "description": "Audience (default PUBLIC)"
                    }
                },
                "required": ["text", "whenIso"]
            }),
        ),
        ToolDefinition::new("list_queue", "List queued posts.", empty_schema()),
        ToolDefinition::new(
            "approve_post",
            "Approve a queued post (simple human-in-the-loop gate).",
            post_id_schema(),
        ),
        ToolDefinition::new(
            "publish_post",
            "Publish an approved post now via LinkedIn Posts API.",
            post_id_schema(),
        ),
    ]
}

/// Get tool by name
pub fn get_tool(name: &str) -> Option<ToolDefinition> {
    all_tools().into_iter().find(|t| t.name == name)
}
