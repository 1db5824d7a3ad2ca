use pubfeed_store::models::{Article, ArticleReading, FetchedDocument, SearchResults};
use pubfeed_store::schema::SEARCH_RESULT_LIMIT;

use super::{CatalogControlPlane, ControlError};

pub const ARTICLE_NOT_FOUND: &str =
    "Article not found. Please provide a valid articleId, url, or title.";
pub const MISSING_SELECTOR: &str = "Provide one of articleId, url, or title.";

/// Ways to identify a single article, checked in the order id, url, title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleSelector {
    pub article_id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

enum Selection<'a> {
    Id(&'a str),
    Url(&'a str),
    Title(String),
}

impl ArticleSelector {
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            article_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Picks the highest-priority selector; empty values count as absent.
    /// Ids and URLs must match exactly, as `fetch` does.
    fn selection(&self) -> Option<Selection<'_>> {
        if let Some(id) = present(self.article_id.as_deref()) {
            return Some(Selection::Id(id));
        }
        if let Some(url) = present(self.url.as_deref()) {
            return Some(Selection::Url(url));
        }
        present(self.title.as_deref()).map(|title| Selection::Title(title.to_lowercase()))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

impl CatalogControlPlane {
    /// Resolves one article and extracts its full page body.
    ///
    /// # Errors
    /// Returns `ControlError::InvalidArgument` when no selector is supplied
    /// and `ControlError::NotFound` when nothing in the catalog matches.
    pub async fn read_article(
        &self,
        selector: &ArticleSelector,
    ) -> Result<ArticleReading, ControlError> {
        let snapshot = self.snapshot().await;
        let article = find_article(snapshot.articles(), selector)?;
        let content = self.extractor.article_text(&article.url).await;
        Ok(ArticleReading {
            article: article.with_content(content),
        })
    }

    /// Keyword search over title, excerpt, and author.
    pub async fn search(&self, query: &str) -> SearchResults {
        let snapshot = self.snapshot().await;
        search(snapshot.articles(), query)
    }

    /// Exact-id lookup returning a bounded plain-text document.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` when `id` is not in the catalog.
    pub async fn fetch(&self, id: &str) -> Result<FetchedDocument, ControlError> {
        let snapshot = self.snapshot().await;
        let article = snapshot
            .articles()
            .iter()
            .find(|article| article.id == id)
            .ok_or_else(|| ControlError::NotFound(format!("Document not found: {id}")))?;
        let text = self
            .extractor
            .document_text(&article.url, &article.excerpt)
            .await;
        Ok(article.to_document(text))
    }
}

/// First article matching the selector.
///
/// # Errors
/// See [`CatalogControlPlane::read_article`].
pub fn find_article<'a>(
    articles: &'a [Article],
    selector: &ArticleSelector,
) -> Result<&'a Article, ControlError> {
    let selection = selector
        .selection()
        .ok_or_else(|| ControlError::InvalidArgument(MISSING_SELECTOR.to_string()))?;

    articles
        .iter()
        .find(|article| match &selection {
            Selection::Id(id) => article.id == *id,
            Selection::Url(url) => article.url == *url,
            Selection::Title(title) => article.title.to_lowercase().contains(title.as_str()),
        })
        .ok_or_else(|| ControlError::NotFound(ARTICLE_NOT_FOUND.to_string()))
}

/// Articles matching ANY whitespace-separated term, in catalog order.
#[must_use]
pub fn search(articles: &[Article], query: &str) -> SearchResults {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return SearchResults {
            results: Vec::new(),
        };
    }

    let results = articles
        .iter()
        .filter(|article| {
            let haystack = article.search_text();
            terms.iter().any(|term| haystack.contains(term.as_str()))
        })
        .take(SEARCH_RESULT_LIMIT)
        .map(Article::search_hit)
        .collect();
    SearchResults { results }
}
