use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use pubfeed_core::registry::{ToolDefinition, ToolError, ToolOutput, health_status};
use pubfeed_store::models::HealthStatus;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Unknown tools and missing articles are 404; bad arguments are 400.
    fn from_tool_error(tool_name: &str, err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(_) => Self::not_found(err.to_string()),
            ToolError::NotFound(message) => Self::not_found(message),
            ToolError::InvalidArguments(message) => Self::bad_request(message),
            ToolError::Internal(message) => {
                error!(tool = tool_name, error = %message, "tool execution failed");
                Self::internal(format!("Error executing tool {tool_name}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}

#[derive(Debug, Serialize)]
struct Endpoints {
    health: &'static str,
    tools: &'static str,
    execute: &'static str,
    mcp: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServerDescriptor {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    profile: &'static str,
    endpoints: Endpoints,
    feed_url: String,
    timestamp: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToolListing {
    tools: Vec<ToolDefinition>,
}

pub(crate) async fn descriptor(State(state): State<AppState>) -> Json<ServerDescriptor> {
    let origin = state.dispatcher.control().cache().origin();
    Json(ServerDescriptor {
        name: "pubfeed-mcp",
        version: env!("CARGO_PKG_VERSION"),
        description: "Remote tool server for a publication's RSS feed",
        profile: state.dispatcher.profile().as_str(),
        endpoints: Endpoints {
            health: "/health",
            tools: "/tools",
            execute: "/tools/:toolName",
            mcp: "/mcp",
        },
        feed_url: origin.base_url().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(health_status())
}

pub(crate) async fn list_tools(State(state): State<AppState>) -> Json<ToolListing> {
    Json(ToolListing {
        tools: state.dispatcher.definitions(),
    })
}

/// Runs one tool with the request body as its arguments. An empty body means
/// no arguments. Unknown tools are rejected before the body is read.
pub(crate) async fn execute_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolOutput>, ApiError> {
    if !state.dispatcher.profile().includes(&tool_name) {
        return Err(ApiError::from_tool_error(
            &tool_name,
            ToolError::UnknownTool(tool_name.clone()),
        ));
    }

    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::bad_request(format!("invalid JSON body: {err}")))?
    };

    let output = state
        .dispatcher
        .call(&tool_name, arguments)
        .await
        .map_err(|err| ApiError::from_tool_error(&tool_name, err))?;
    Ok(Json(output))
}
