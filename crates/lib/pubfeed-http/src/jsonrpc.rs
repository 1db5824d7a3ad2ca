//! JSON-RPC 2.0 facade speaking the MCP method subset over plain HTTP POST.
//!
//! Every reply, including errors, is sent with HTTP 200; notifications are
//! acknowledged with 202 and no body.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pubfeed_core::registry::{ToolDispatcher, ToolError};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::AppState;

pub(crate) const PROTOCOL_VERSION: &str = "2024-11-05";

pub(crate) const PARSE_ERROR: i32 = -32700;
pub(crate) const INVALID_REQUEST: i32 = -32600;
pub(crate) const METHOD_NOT_FOUND: i32 = -32601;
pub(crate) const INVALID_PARAMS: i32 = -32602;
pub(crate) const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RpcError {
    code: i32,
    message: String,
}

impl RpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn from_tool_error(err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(_) => Self::new(METHOD_NOT_FOUND, err.to_string()),
            ToolError::InvalidArguments(message) | ToolError::NotFound(message) => {
                Self::new(INVALID_PARAMS, message)
            }
            ToolError::Internal(message) => {
                error!(error = %message, "tool execution failed");
                Self::new(INTERNAL_ERROR, "Internal error")
            }
        }
    }
}

/// Response envelope; `id` is always present and `null` when unknown.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Value,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(error),
            id,
        }
    }
}

impl IntoResponse for RpcResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub(crate) async fn handle(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(envelope) = serde_json::from_slice::<Value>(&body) else {
        return RpcResponse::failure(Value::Null, RpcError::new(PARSE_ERROR, "Parse error"))
            .into_response();
    };
    let Value::Object(envelope) = envelope else {
        return RpcResponse::failure(Value::Null, invalid_request()).into_response();
    };

    let id = envelope.get("id").cloned();
    let method = envelope.get("method").and_then(Value::as_str);
    let (Some("2.0"), Some(method)) = (envelope.get("jsonrpc").and_then(Value::as_str), method)
    else {
        return RpcResponse::failure(id.unwrap_or(Value::Null), invalid_request()).into_response();
    };

    let Some(id) = id else {
        if method.starts_with("notifications/") {
            debug!(method, "notification acknowledged");
            return StatusCode::ACCEPTED.into_response();
        }
        return RpcResponse::failure(Value::Null, invalid_request()).into_response();
    };

    let params = envelope.get("params").cloned().unwrap_or(Value::Null);
    let response = match dispatch(&state.dispatcher, method, params).await {
        Ok(result) => RpcResponse::success(id, result),
        Err(err) => RpcResponse::failure(id, err),
    };
    response.into_response()
}

fn invalid_request() -> RpcError {
    RpcError::new(INVALID_REQUEST, "Invalid Request")
}

async fn dispatch(
    dispatcher: &ToolDispatcher,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    debug!(method, "json-rpc request");
    match method {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": "pubfeed-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            },
        })),
        "ping" => Ok(json!({})),
        "tools/list" => serde_json::to_value(dispatcher.definitions())
            .map(|tools| json!({ "tools": tools }))
            .map_err(|err| RpcError::from_tool_error(ToolError::Internal(err.to_string()))),
        "tools/call" => call_tool(dispatcher, params).await,
        _ => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )),
    }
}

/// Runs a tool and wraps its result as pretty-printed text content.
async fn call_tool(dispatcher: &ToolDispatcher, params: Value) -> Result<Value, RpcError> {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return Err(RpcError::new(INVALID_PARAMS, "Invalid params: tool name is required"));
    };
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let output = dispatcher
        .call(name, arguments)
        .await
        .map_err(RpcError::from_tool_error)?;
    let text = serde_json::to_string_pretty(&output)
        .map_err(|err| RpcError::from_tool_error(ToolError::Internal(err.to_string())))?;
    Ok(json!({
        "content": [{ "type": "text", "text": text }],
    }))
}
