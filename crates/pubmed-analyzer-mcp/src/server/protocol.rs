//! JSON-RPC 2.0 messages and MCP method dispatch shared by both transports.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{AnalysisError, ClientError, StoreError, ToolError};
use crate::tools::{McpTool, ToolContext};

/// Protocol version answered when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `initialize`.
pub const SERVER_NAME: &str = "pubmed-analyzer-mcp";

/// JSON-RPC error codes.
pub mod codes {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Bad or missing parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Tool failed.
    pub const TOOL_ERROR: i32 = -32000;
    /// Result file missing.
    pub const NOT_FOUND: i32 = -32001;
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id are notifications and get no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: Cow::Borrowed(Self::VERSION), result: Some(result), error: None, id }
    }

    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data: None }),
            id,
        }
    }

    /// Error response for a failed tool call. The error kind goes in `data`.
    #[must_use]
    pub fn tool_error(id: Option<Value>, err: &ToolError) -> Self {
        let (code, kind) = classify(err);
        let mut response = Self::error(id, code, err.to_user_message());
        if let Some(error) = response.error.as_mut() {
            error.data = Some(json!({ "kind": kind }));
        }
        response
    }
}

fn classify(err: &ToolError) -> (i32, &'static str) {
    match err {
        ToolError::Analysis(AnalysisError::InvalidParameter { .. })
        | ToolError::Validation { .. }
        | ToolError::Serialization(_)
        | ToolError::Store(StoreError::InvalidName { .. }) => (codes::INVALID_PARAMS, "invalid_parameter"),
        ToolError::Analysis(AnalysisError::NotFound { .. })
        | ToolError::Store(StoreError::NotFound { .. }) => (codes::NOT_FOUND, "not_found"),
        ToolError::Client(ClientError::RateLimited { .. }) => (codes::TOOL_ERROR, "rate_limited"),
        ToolError::Client(_) => (codes::TOOL_ERROR, "upstream"),
        ToolError::Analysis(AnalysisError::Store(_)) | ToolError::Store(_) => (codes::TOOL_ERROR, "storage"),
        ToolError::Unavailable(_) => (codes::TOOL_ERROR, "unavailable"),
        ToolError::Internal(_) => (codes::TOOL_ERROR, "internal"),
    }
}

/// MCP tool info for tools/list response.
#[derive(Debug, Serialize)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Routes MCP methods to the registered tools.
pub struct Dispatcher {
    tools: Vec<Box<dyn McpTool>>,
    ctx: ToolContext,
}

impl Dispatcher {
    /// Create a dispatcher over `tools`.
    #[must_use]
    pub fn new(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Arc<Self> {
        Arc::new(Self { tools, ctx })
    }

    /// Number of registered tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Handle one request. Notifications yield `None`.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %req.method, "Received request");

        if req.is_notification() {
            return None;
        }

        let id = req.id.clone();
        let response = match req.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(&req.params)),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": self.tool_infos() })),
            "tools/call" => self.call_tool(id, &req.params).await,
            "ping" | "initialized" | "notifications/initialized" => {
                JsonRpcResponse::success(id, json!({}))
            }
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ),
        };
        Some(response)
    }

    fn tool_infos(&self) -> Vec<McpToolInfo> {
        self.tools
            .iter()
            .map(|t| McpToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    async fn call_tool(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
        };

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let Some(tool) = self.tools.iter().find(|t| t.name() == tool_name) else {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Tool not found: {tool_name}"),
            );
        };

        tracing::info!(tool = %tool_name, "Executing tool");

        match tool.execute(&self.ctx, arguments).await {
            Ok(result) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": result
                    }]
                }),
            ),
            Err(e) => {
                tracing::error!(tool = %tool_name, error = %e, "Tool execution failed");
                JsonRpcResponse::tool_error(id, &e)
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tools", &self.tools.len()).finish()
    }
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}
