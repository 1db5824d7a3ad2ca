use std::borrow::Cow;

use pubfeed_core::registry::ToolError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use tracing::error;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Not-found and bad arguments both surface as invalid params.
pub(crate) fn map_tool_err(err: ToolError) -> ErrorData {
    match err {
        ToolError::UnknownTool(_) => mcp_err(ErrorCode::METHOD_NOT_FOUND, err.to_string()),
        ToolError::InvalidArguments(message) | ToolError::NotFound(message) => {
            mcp_err(ErrorCode::INVALID_PARAMS, message)
        }
        ToolError::Internal(message) => {
            error!(error = %message, "tool execution failed");
            mcp_err(ErrorCode::INTERNAL_ERROR, "Error executing tool")
        }
    }
}
