// MCP server: newline-delimited JSON-RPC over stdio

use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

/// Longest accepted request line.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            server_info: ServerInfo {
                name: "lolbyte-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn start(self) -> Result<()> {
        tracing::info!(tools = self.registry.len(), "MCP server running on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read line by line from `reader`. Each request runs on
    /// its own task, so responses may be written out of order.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LinesCodec::new());
            while let Some(response) = rx.recv().await {
                let line = match serde_json::to_string(&response) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize response");
                        continue;
                    }
                };
                if let Err(e) = sink.send(line).await {
                    tracing::error!(error = %e, "Failed to write response");
                    break;
                }
            }
        });

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    tracing::warn!(max = MAX_LINE_LENGTH, "Dropping oversized request line");
                    let _ = tx.send(JsonRpcResponse::error(Value::Null, JsonRpcError::invalid_request()));
                    continue;
                }
                Err(LinesCodecError::Io(e)) => {
                    return Err(e).context("Failed to read from transport");
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    let _ = tx.send(response);
                }
            });
        }

        tracing::info!("Input closed, waiting for in-flight requests");
        drop(tx);
        writer_task.await.context("Response writer task failed")?;

        Ok(())
    }

    /// Handle one raw JSON-RPC message.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request())),
        }
    }

    /// Dispatch a request. Notifications never produce a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(params) => {
                    let client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown");
                    tracing::info!(
                        client = %client,
                        protocol_version = %params.protocol_version,
                        "Client initialized"
                    );
                }
                Err(e) => return Err(JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e))),
            }
        }

        to_result(&InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: self.server_info.clone(),
        })
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(&ListToolsResult {
            tools: self.registry.list_schemas(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("Missing params for tools/call"))
            .and_then(|params| {
                serde_json::from_value(params)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))
            })?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::unknown_tool(&params.name))?;

        tracing::info!(tool = %params.name, "Executing tool");
        match tool.execute(params.arguments).await {
            Ok(result) => to_result(&result),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool execution failed");
                Err(e.into_rpc_error(&params.name))
            }
        }
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize result");
        JsonRpcError::internal_error("Internal error")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::protocol::{CallToolResult, ToolSchema};
    use crate::tools::{json_schema_object, json_schema_string, parse_args, Tool};
    use lolbyte_core::LolError;
    use serde::Deserialize;
    use serde_json::json;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    /// Echoes its `text` argument; `fail` selects an error path.
    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
        #[serde(default)]
        fail: Option<String>,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echo text".to_string(),
                input_schema: json_schema_object(
                    json!({"text": json_schema_string("Text to echo")}),
                    vec!["text"],
                ),
            }
        }

        async fn execute(&self, arguments: Value) -> Result<CallToolResult, ToolError> {
            let args: EchoArgs = parse_args("echo", arguments)?;
            match args.fail.as_deref() {
                Some("upstream") => Err(LolError::Upstream {
                    status: Some(503),
                    message: "Service unavailable".to_string(),
                }
                .into()),
                Some("input") => Err(LolError::InvalidInput("bad input".to_string()).into()),
                _ => Ok(CallToolResult::json(&json!({"echo": args.text}))?),
            }
        }
    }

    fn create_server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        McpServer::new(registry)
    }

    async fn call(server: &McpServer, method: &str, params: Value) -> JsonRpcResponse {
        server
            .handle_request(JsonRpcRequest::new(1, method, params))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = create_server();
        let response = call(
            &server,
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            }),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "lolbyte-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = create_server();
        let response = call(&server, "tools/list", json!({})).await;

        let result = response.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "echo");
        assert_eq!(result["tools"][0]["inputSchema"]["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn test_call_tool_success() {
        let server = create_server();
        let response = call(
            &server,
            "tools/call",
            json!({"name": "echo", "arguments": {"text": "hi"}}),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "{\n  \"echo\": \"hi\"\n}");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = create_server();
        let response = call(&server, "tools/call", json!({"name": "get_champion", "arguments": {}})).await;

        let error = response.error.unwrap();
        assert_eq!(error.code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(error.message, "Unknown tool: get_champion");
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let server = create_server();
        let response = call(&server, "tools/call", json!({"name": "echo", "arguments": {}})).await;

        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_invalid_input_from_core() {
        let server = create_server();
        let response = call(
            &server,
            "tools/call",
            json!({"name": "echo", "arguments": {"text": "x", "fail": "input"}}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, JsonRpcError::INVALID_PARAMS);
        assert_eq!(error.message, "bad input");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_internal_error() {
        let server = create_server();
        let response = call(
            &server,
            "tools/call",
            json!({"name": "echo", "arguments": {"text": "x", "fail": "upstream"}}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, JsonRpcError::INTERNAL_ERROR);
        assert!(error.message.starts_with("Error executing tool echo:"));
        assert_eq!(error.data, Some(json!({"status": 503})));
    }

    #[tokio::test]
    async fn test_missing_call_params() {
        let server = create_server();
        let response = server
            .handle_request(JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: Some(json!(3)),
                method: "tools/call".to_string(),
                params: None,
            })
            .await
            .unwrap();

        assert_eq!(response.id, json!(3));
        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = create_server();
        let response = call(&server, "resources/list", json!({})).await;

        assert_eq!(response.error.unwrap().code, JsonRpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let server = create_server();
        let response = server
            .handle_request(JsonRpcRequest::notification("notifications/initialized"))
            .await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let server = create_server();
        let response = server.handle_message("{not json").await.unwrap();

        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, JsonRpcError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_request_keeps_id() {
        let server = create_server();
        let response = server.handle_message(r#"{"jsonrpc":"2.0","id":9}"#).await.unwrap();

        assert_eq!(response.id, json!(9));
        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let server = create_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"1.0","id":2,"method":"ping"}"#)
            .await
            .unwrap();

        assert_eq!(response.error.unwrap().code, JsonRpcError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_serve_over_stream() {
        let server = create_server();
        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, client_out) = tokio::io::duplex(64 * 1024);

        let serve = tokio::spawn(server.serve(server_in, server_out));

        client_in
            .write_all(
                concat!(
                    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
                    "\n",
                    r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "\n",
                    r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hello"}}}"#, "\n",
                )
                .as_bytes(),
            )
            .await
            .unwrap();
        drop(client_in);

        serve.await.unwrap().unwrap();

        let mut responses = Vec::new();
        let mut lines = BufReader::new(client_out).lines();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str::<JsonRpcResponse>(&line).unwrap());
        }
        responses.sort_by_key(|r| r.id.as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(responses[0].result, Some(json!({})));
        assert_eq!(responses[1].id, json!(2));
        assert_eq!(
            responses[1].result.as_ref().unwrap()["content"][0]["text"],
            "{\n  \"echo\": \"hello\"\n}"
        );
    }
}
