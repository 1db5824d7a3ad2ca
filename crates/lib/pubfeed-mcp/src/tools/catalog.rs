use pubfeed_core::registry::{ListArticlesParams, ReadArticleParams, ToolCall};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::PubfeedMcp;

#[tool_router(router = tool_router_catalog, vis = "pub")]
impl PubfeedMcp {
    #[tool(description = "List articles from the publication feed, optionally filtered by author or topic.")]
    async fn list_articles(
        &self,
        Parameters(params): Parameters<ListArticlesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::ListArticles(params)).await
    }

    #[tool(description = "List all authors who have written articles.")]
    async fn list_authors(&self) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::ListAuthors).await
    }

    #[tool(description = "List all topics covered in the articles.")]
    async fn list_topics(&self) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::ListTopics).await
    }

    #[tool(description = "Read the full content of an article by its id, URL, or title.")]
    async fn read_article(
        &self,
        Parameters(params): Parameters<ReadArticleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(ToolCall::ReadArticle(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubfeed_core::registry::ToolProfile;
    use rmcp::model::ErrorCode;

    use crate::testing;

    fn server() -> PubfeedMcp {
        PubfeedMcp::new(testing::dispatcher(ToolProfile::Catalog))
    }

    fn text_of(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).expect("result should serialize");
        value["content"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn list_articles_returns_listing_json() {
        let result = server()
            .list_articles(Parameters(ListArticlesParams {
                limit: Some(1),
                ..ListArticlesParams::default()
            }))
            .await
            .expect("listing should succeed");
        let listing: serde_json::Value =
            serde_json::from_str(&text_of(&result)).expect("content should be JSON");
        assert_eq!(listing["total"], 2);
        assert_eq!(listing["showing"], 1);
        assert_eq!(listing["articles"][0]["id"], "a1");
    }

    #[tokio::test]
    async fn read_article_for_missing_id_is_invalid_params() {
        let err = server()
            .read_article(Parameters(ReadArticleParams {
                article_id: Some("a3".to_string()),
                ..ReadArticleParams::default()
            }))
            .await
            .expect_err("a3 is not in the catalog");
        assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
        assert!(err.message.starts_with("Article not found"));
    }

    #[tokio::test]
    async fn read_article_without_selector_is_invalid_params() {
        let err = server()
            .read_article(Parameters(ReadArticleParams::default()))
            .await
            .expect_err("a selector is required");
        assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
    }
}
