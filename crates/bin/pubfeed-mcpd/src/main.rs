//! Daemon entry point for the pubfeed MCP server.
//!
//! Loads configuration from arguments and the environment, wires the catalog
//! cache and tool dispatcher, and serves either the HTTP facades or MCP over
//! stdio.

mod catalog;
mod config;
mod logging;

use pubfeed_http::{HttpServer, HttpServerConfig};
use tracing::info;

use crate::catalog::build_dispatcher;
use crate::config::{PubfeedConfig, TransportMode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = PubfeedConfig::from_args()?;
    logging::init_tracing(config.debug);
    info!(
        feed_url = %config.feed_url,
        profile = %config.profile,
        mode = ?config.mode,
        "starting pubfeed-mcpd"
    );

    let dispatcher = build_dispatcher(&config)?;
    match config.mode {
        TransportMode::Stdio => pubfeed_mcp::server::serve_stdio(dispatcher).await,
        TransportMode::Http => {
            let server_config =
                HttpServerConfig::new(config.addr).with_max_body_bytes(config.max_body_bytes);
            HttpServer::new(dispatcher, server_config).serve().await
        }
    }
}
