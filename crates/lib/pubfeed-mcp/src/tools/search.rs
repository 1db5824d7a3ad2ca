use pubfeed_core::registry::{FetchParams, SearchParams, ToolCall};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::PubfeedMcp;

#[tool_router(router = tool_router_search, vis = "pub")]
impl PubfeedMcp {
    #[tool(description = "Search articles by keywords in their title, excerpt, or author.")]
    async fn search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::Search(params)).await
    }

    #[tool(description = "Fetch the text of a single article by the id returned from search.")]
    async fn fetch(
        &self,
        Parameters(params): Parameters<FetchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::Fetch(params)).await
    }
}
