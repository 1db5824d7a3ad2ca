//! MCP server implementation for pubfeed.
//!
//! This crate exposes the tool dispatcher through rmcp tool handlers. The
//! tools mounted depend on the dispatcher's profile.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use pubfeed_core::registry::{ToolCall, ToolDispatcher, ToolError, ToolProfile};
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    service::RequestContext,
    tool,
    tool_router,
};
use rmcp::model::{
    CallToolRequestParams,
    CallToolResult,
    Content,
    Implementation,
    ListToolsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};

const CATALOG_INSTRUCTIONS: &str = r"pubfeed serves articles from a publication's RSS feed.

Workflow:
1. Call `list_articles` to browse; narrow with `author` or `topic` (case-insensitive substring) and `limit` (default 10).
2. Call `list_authors` or `list_topics` for aggregate views, most prolific first.
3. Call `read_article` with one of `articleId`, `url`, or `title` to get the full text.

Notes:
- Article ids are the URL slug and stay stable across refreshes.
- The catalog refreshes at most once per cache TTL; if the feed is unreachable a small sample catalog is served.
- `health` reports liveness.";

const SEARCH_INSTRUCTIONS: &str = r"pubfeed serves articles from a publication's RSS feed.

Workflow:
1. Call `search` with keywords; an article matches if any keyword appears in its title, excerpt, or author. At most 10 results, in feed order.
2. Call `fetch` with an `id` from the results to get up to 2000 characters of article text.

Notes:
- `health` reports liveness.";

/// MCP server wrapper around the tool dispatcher.
#[derive(Clone)]
pub struct PubfeedMcp {
    tool_router: ToolRouter<Self>,
    dispatcher: Arc<ToolDispatcher>,
}

impl PubfeedMcp {
    #[must_use]
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self::with_dispatcher(Arc::new(dispatcher))
    }

    /// Creates a server sharing an existing dispatcher, mounting only the
    /// tools of its profile.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<ToolDispatcher>) -> Self {
        let tool_router = match dispatcher.profile() {
            ToolProfile::Catalog => Self::tool_router_core() + Self::tool_router_catalog(),
            ToolProfile::Search => Self::tool_router_core() + Self::tool_router_search(),
        };
        Self {
            tool_router,
            dispatcher,
        }
    }

    #[must_use]
    pub fn profile(&self) -> ToolProfile {
        self.dispatcher.profile()
    }

    pub(crate) async fn run(&self, call: ToolCall) -> Result<CallToolResult, ErrorData> {
        let output = self
            .dispatcher
            .execute(call)
            .await
            .map_err(helpers::map_tool_err)?;
        Ok(CallToolResult::success(vec![Content::json(output)?]))
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl PubfeedMcp {
    #[tool(description = "Report server liveness and the current time.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::Health).await
    }
}

impl ServerHandler for PubfeedMcp {
    fn get_info(&self) -> ServerInfo {
        let instructions = match self.profile() {
            ToolProfile::Catalog => CATALOG_INSTRUCTIONS,
            ToolProfile::Search => SEARCH_INSTRUCTIONS,
        };
        ServerInfo {
            instructions: Some(instructions.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pubfeed-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Tools outside the profile are unknown operations, not bad params.
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if !self.tool_router.has_route(&request.name) {
            return Err(helpers::map_tool_err(ToolError::UnknownTool(
                request.name.to_string(),
            )));
        }
        let call = ToolCallContext::new(self, request, context);
        self.tool_router.call(call).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            meta: None,
            next_cursor: None,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pubfeed_core::registry::tool_definitions;

    fn assert_router_matches_registry(profile: ToolProfile) {
        let server = PubfeedMcp::new(testing::dispatcher(profile));
        let mut mounted: Vec<(String, Option<String>)> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| (tool.name.to_string(), tool.description.map(|text| text.to_string())))
            .collect();
        mounted.sort();

        let mut expected: Vec<(String, Option<String>)> = tool_definitions(profile)
            .into_iter()
            .map(|definition| {
                (
                    definition.name.to_string(),
                    Some(definition.description.to_string()),
                )
            })
            .collect();
        expected.sort();

        assert_eq!(mounted, expected);
    }

    #[test]
    fn catalog_router_matches_registry() {
        assert_router_matches_registry(ToolProfile::Catalog);
    }

    #[test]
    fn search_router_matches_registry() {
        assert_router_matches_registry(ToolProfile::Search);
    }

    #[test]
    fn handshake_names_the_server() {
        let server = PubfeedMcp::new(testing::dispatcher(ToolProfile::Catalog));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "pubfeed-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn instructions_follow_profile() {
        let server = PubfeedMcp::new(testing::dispatcher(ToolProfile::Search));
        let instructions = server.get_info().instructions.unwrap_or_default();
        assert!(instructions.contains("`fetch`"));
        assert!(!instructions.contains("list_articles"));
    }
}
