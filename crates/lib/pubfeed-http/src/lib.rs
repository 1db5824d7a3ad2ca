//! HTTP facades for pubfeed.
//!
//! Serves a REST facade (`/`, `/health`, `/tools`, `/tools/:tool_name`) and a
//! JSON-RPC 2.0 endpoint (`/mcp`) on one router. Both decode requests into
//! tool calls on the shared dispatcher and translate its errors into their
//! own wire vocabulary.

mod jsonrpc;
mod rest;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use pubfeed_core::registry::ToolDispatcher;
use tower_http::cors::CorsLayer;
use tracing::info;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl HttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }
}

/// HTTP server wrapper.
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    #[must_use]
    pub const fn new(dispatcher: Arc<ToolDispatcher>, config: HttpServerConfig) -> Self {
        Self {
            config,
            state: AppState { dispatcher },
        }
    }

    /// Runs the HTTP server until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let profile = self.state.dispatcher.profile();
        let app = router(self.state, self.config.max_body_bytes);

        info!(%profile, "pubfeed listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dispatcher: Arc<ToolDispatcher>,
}

/// Builds the full router; exposed so callers can serve or test it in-process.
#[must_use]
pub fn build_router(dispatcher: Arc<ToolDispatcher>, max_body_bytes: usize) -> Router {
    router(AppState { dispatcher }, max_body_bytes)
}

fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(rest::descriptor))
        .route("/health", get(rest::health))
        .route("/tools", get(rest::list_tools))
        .route("/tools/:tool_name", post(rest::execute_tool))
        .route("/mcp", post(jsonrpc::handle))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
