use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized article record held in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Source-native date string, kept verbatim.
    pub published_date: String,
    pub url: String,
    pub excerpt: String,
    pub topics: Vec<String>,
}

/// Per-author aggregate derived from a catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub name: String,
    pub article_count: usize,
    pub latest_article: String,
}

/// Per-topic aggregate derived from a catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub name: String,
    pub article_count: usize,
    /// Contributing article titles in catalog order.
    pub articles: Vec<String>,
}

/// Result of `list_articles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ArticleListing {
    pub articles: Vec<Article>,
    /// Matches after filtering, before the limit is applied.
    pub total: usize,
    /// Articles actually returned.
    pub showing: usize,
}

/// Result of `list_authors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct AuthorListing {
    pub authors: Vec<AuthorSummary>,
}

/// Result of `list_topics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct TopicListing {
    pub topics: Vec<TopicSummary>,
}

/// Article metadata plus the extracted page body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleContent {
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub url: String,
    pub topics: Vec<String>,
    pub content: String,
}

/// Result of `read_article`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ArticleReading {
    pub article: ArticleContent,
}

/// Compact search hit; `text` carries the excerpt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Result of `search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub author: String,
    pub published_date: String,
    pub excerpt: String,
}

/// Result of `fetch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct FetchedDocument {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: String,
    pub metadata: DocumentMetadata,
}

/// Liveness payload shared by every transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct HealthStatus {
    pub status: String,
    /// RFC 3339 timestamp of the probe.
    pub timestamp: String,
}

impl Article {
    /// Returns the search haystack: title, excerpt, and author, lowercased.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.excerpt, self.author).to_lowercase()
    }

    #[must_use]
    pub fn search_hit(&self) -> SearchHit {
        SearchHit {
            id: self.id.clone(),
            title: self.title.clone(),
            text: self.excerpt.clone(),
            url: self.url.clone(),
        }
    }

    /// Pairs the article metadata with an extracted body.
    #[must_use]
    pub fn with_content(&self, content: String) -> ArticleContent {
        ArticleContent {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            published_date: self.published_date.clone(),
            url: self.url.clone(),
            topics: self.topics.clone(),
            content,
        }
    }

    #[must_use]
    pub fn to_document(&self, text: String) -> FetchedDocument {
        FetchedDocument {
            id: self.id.clone(),
            title: self.title.clone(),
            text,
            url: self.url.clone(),
            metadata: DocumentMetadata {
                author: self.author.clone(),
                published_date: self.published_date.clone(),
                excerpt: self.excerpt.clone(),
            },
        }
    }
}
