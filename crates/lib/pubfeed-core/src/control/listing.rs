use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use pubfeed_store::models::{
    Article,
    ArticleListing,
    AuthorListing,
    AuthorSummary,
    TopicListing,
    TopicSummary,
};
use pubfeed_store::schema::DEFAULT_LIST_LIMIT;

use super::CatalogControlPlane;

/// Filters for `list_articles`. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub limit: Option<usize>,
    pub author: Option<String>,
    pub topic: Option<String>,
}

impl ArticleFilter {
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

impl CatalogControlPlane {
    /// Lists articles filtered by author then topic, truncated to the limit.
    pub async fn list_articles(&self, filter: &ArticleFilter) -> ArticleListing {
        let snapshot = self.snapshot().await;
        list_articles(snapshot.articles(), filter)
    }

    /// Aggregates articles per author, most prolific first.
    pub async fn list_authors(&self) -> AuthorListing {
        let snapshot = self.snapshot().await;
        list_authors(snapshot.articles())
    }

    /// Aggregates articles per topic label, most used first.
    pub async fn list_topics(&self) -> TopicListing {
        let snapshot = self.snapshot().await;
        list_topics(snapshot.articles())
    }
}

#[must_use]
pub fn list_articles(articles: &[Article], filter: &ArticleFilter) -> ArticleListing {
    let author = non_empty_lowercase(filter.author.as_deref());
    let topic = non_empty_lowercase(filter.topic.as_deref());

    let matching: Vec<&Article> = articles
        .iter()
        .filter(|article| {
            author
                .as_deref()
                .is_none_or(|author| article.author.to_lowercase().contains(author))
        })
        .filter(|article| {
            topic.as_deref().is_none_or(|topic| {
                article
                    .topics
                    .iter()
                    .any(|label| label.to_lowercase().contains(topic))
            })
        })
        .collect();

    let total = matching.len();
    let articles: Vec<Article> = matching
        .into_iter()
        .take(filter.limit())
        .cloned()
        .collect();
    ArticleListing {
        showing: articles.len(),
        total,
        articles,
    }
}

/// Authors in descending article count; ties keep first-encounter order.
#[must_use]
pub fn list_authors(articles: &[Article]) -> AuthorListing {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut authors: Vec<AuthorSummary> = Vec::new();

    for article in articles {
        if let Some(&position) = index.get(article.author.as_str()) {
            let summary = &mut authors[position];
            summary.article_count += 1;
            if is_later(&article.published_date, &summary.latest_article) {
                summary.latest_article.clone_from(&article.published_date);
            }
        } else {
            index.insert(article.author.as_str(), authors.len());
            authors.push(AuthorSummary {
                name: article.author.clone(),
                article_count: 1,
                latest_article: article.published_date.clone(),
            });
        }
    }

    authors.sort_by(|left, right| right.article_count.cmp(&left.article_count));
    AuthorListing { authors }
}

/// Topics in descending article count; ties keep first-encounter order.
#[must_use]
pub fn list_topics(articles: &[Article]) -> TopicListing {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut topics: Vec<TopicSummary> = Vec::new();

    for article in articles {
        for label in &article.topics {
            if let Some(&position) = index.get(label.as_str()) {
                let summary = &mut topics[position];
                summary.article_count += 1;
                summary.articles.push(article.title.clone());
            } else {
                index.insert(label.as_str(), topics.len());
                topics.push(TopicSummary {
                    name: label.clone(),
                    article_count: 1,
                    articles: vec![article.title.clone()],
                });
            }
        }
    }

    topics.sort_by(|left, right| right.article_count.cmp(&left.article_count));
    TopicListing { topics }
}

/// Parses RSS (RFC 2822) or RFC 3339 dates.
#[must_use]
pub fn parse_published(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

/// Parsed dates compare chronologically and beat unparseable ones; two
/// unparseable values keep the incumbent.
fn is_later(candidate: &str, incumbent: &str) -> bool {
    match (parse_published(candidate), parse_published(incumbent)) {
        (Some(candidate), Some(incumbent)) => candidate > incumbent,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn non_empty_lowercase(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}
