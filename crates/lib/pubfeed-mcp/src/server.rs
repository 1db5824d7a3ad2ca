//! MCP server runners for pubfeed.

use std::sync::Arc;

use pubfeed_core::registry::ToolDispatcher;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use tracing::info;

use crate::PubfeedMcp;

/// Serves the MCP server over stdio until the client disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    dispatcher: Arc<ToolDispatcher>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = PubfeedMcp::with_dispatcher(dispatcher);
    info!(profile = %service.profile(), "serving MCP over stdio");
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    info!("MCP stdio session ended");
    Ok(())
}
