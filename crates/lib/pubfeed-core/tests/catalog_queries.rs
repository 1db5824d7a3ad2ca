use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pubfeed_core::control::{ArticleFilter, ArticleSelector, CatalogControlPlane, ControlError};
use pubfeed_core::extract::FETCH_FAILED_PLACEHOLDER;
use pubfeed_core::origin::{Origin, OriginError, OriginFuture};
use pubfeed_core::registry::{ToolDispatcher, ToolError, ToolOutput, ToolProfile};
use pubfeed_core::services::{CatalogCache, CatalogCacheConfig, SnapshotSource};
use serde_json::json;

const BASE_URL: &str = "https://example.substack.com";
const GOVERNANCE_URL: &str = "https://example.substack.com/p/ai-governance-best-practices";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| {
        let path_display = path.display();
        panic!("failed to read fixture at {path_display}: {err}")
    })
}

/// In-memory origin serving the fixture feed and a fixed set of pages.
struct FixtureOrigin {
    feed: Option<String>,
    pages: HashMap<String, String>,
    feed_calls: AtomicUsize,
}

impl FixtureOrigin {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(GOVERNANCE_URL.to_string(), fixture("article.html"));
        Self {
            feed: Some(fixture("feed.xml")),
            pages,
            feed_calls: AtomicUsize::new(0),
        }
    }

    fn offline() -> Self {
        Self {
            feed: None,
            pages: HashMap::new(),
            feed_calls: AtomicUsize::new(0),
        }
    }
}

impl Origin for FixtureOrigin {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn fetch_feed(&self) -> OriginFuture<'_> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.feed.clone().ok_or_else(|| OriginError::Request {
            url: format!("{BASE_URL}/feed"),
            message: "connection refused".to_string(),
        });
        Box::pin(async move { result })
    }

    fn fetch_page<'a>(&'a self, url: &'a str) -> OriginFuture<'a> {
        let result = self.pages.get(url).cloned().ok_or_else(|| OriginError::Status {
            url: url.to_string(),
            status: 404,
        });
        Box::pin(async move { result })
    }
}

fn control_plane(origin: Arc<FixtureOrigin>) -> CatalogControlPlane {
    let cache = CatalogCache::new(origin, CatalogCacheConfig::default());
    CatalogControlPlane::new(Arc::new(cache))
}

#[tokio::test]
async fn fixture_feed_normalizes_into_catalog() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let snapshot = control.cache().snapshot().await;
    assert_eq!(snapshot.source(), SnapshotSource::Origin);

    let ids: Vec<&str> = snapshot.articles().iter().map(|article| article.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "ai-governance-best-practices",
            "measuring-ai-roi",
            "scaling-ml-teams",
            "measuring-ai-roi-4",
        ]
    );

    let governance = &snapshot.articles()[0];
    assert_eq!(governance.author, "Dr. Sarah Johnson");
    assert_eq!(governance.excerpt, "Frameworks for responsible deployment\u{a0}at scale.");
    assert_eq!(governance.topics, vec!["AI Governance"]);

    let roi = &snapshot.articles()[1];
    assert_eq!(roi.topics, vec!["ROI", "Metrics"]);
    assert!(roi.excerpt.contains("projects - with"));

    let scaling = &snapshot.articles()[2];
    assert_eq!(scaling.author, "AI CoE Team");
    assert!(scaling.topics.contains(&"Machine Learning".to_string()));

    for article in snapshot.articles() {
        assert!(!article.id.is_empty());
        assert!(!article.title.is_empty());
        assert!(!article.topics.is_empty());
        assert!(article.excerpt.chars().count() <= 203);
    }
}

#[tokio::test]
async fn topic_filter_counts_before_limit() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let listing = control
        .list_articles(&ArticleFilter {
            limit: Some(10),
            topic: Some("governance".to_string()),
            ..ArticleFilter::default()
        })
        .await;
    assert_eq!(listing.total, 1);
    assert_eq!(listing.showing, 1);
    assert_eq!(listing.articles[0].title, "Best Practices for AI Governance");
}

#[tokio::test]
async fn authors_and_topics_aggregate_the_snapshot() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));

    let authors = control.list_authors().await.authors;
    assert_eq!(authors[0].name, "Michael Chen");
    assert_eq!(authors[0].article_count, 2);
    assert_eq!(authors[0].latest_article, "Tue, 03 Jun 2025 10:00:00 GMT");
    assert_eq!(authors.iter().map(|author| author.article_count).sum::<usize>(), 4);

    let topics = control.list_topics().await.topics;
    assert_eq!(topics[0].name, "ROI");
    assert_eq!(
        topics[0].articles,
        vec!["Measuring ROI of AI Initiatives", "Measuring ROI, revisited"]
    );
}

#[tokio::test]
async fn search_matches_excerpt_terms_only() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let results = control.search("machine learning").await.results;
    let titles: Vec<&str> = results.iter().map(|hit| hit.title.as_str()).collect();
    assert_eq!(titles, vec!["Scaling Machine Learning Teams"]);
    assert!(!titles.contains(&"Best Practices for AI Governance"));
}

#[tokio::test]
async fn read_article_extracts_page_body() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let reading = control
        .read_article(&ArticleSelector {
            title: Some("ai governance".to_string()),
            ..ArticleSelector::default()
        })
        .await
        .expect("governance article should resolve");
    assert_eq!(reading.article.id, "ai-governance-best-practices");
    assert!(reading.article.content.starts_with("Governance starts with an inventory"));
    assert!(!reading.article.content.contains("Subscribe"));
}

#[tokio::test]
async fn read_article_degrades_when_page_is_missing() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let reading = control
        .read_article(&ArticleSelector::by_id("scaling-ml-teams"))
        .await
        .expect("article exists even if its page does not");
    assert_eq!(reading.article.content, FETCH_FAILED_PLACEHOLDER);
}

#[tokio::test]
async fn fetch_strips_markup_and_keeps_metadata() {
    let control = control_plane(Arc::new(FixtureOrigin::new()));
    let document = control
        .fetch("ai-governance-best-practices")
        .await
        .expect("document should resolve");
    assert!(document.text.contains("Governance starts with an inventory"));
    assert!(!document.text.contains("__analytics"));
    assert!(document.text.chars().count() <= 2003);
    assert_eq!(document.metadata.author, "Dr. Sarah Johnson");

    let thin = control
        .fetch("scaling-ml-teams")
        .await
        .expect("document should resolve");
    assert_eq!(thin.text, thin.metadata.excerpt);

    assert!(matches!(
        control.fetch("a3").await,
        Err(ControlError::NotFound(_))
    ));
}

#[tokio::test]
async fn offline_origin_serves_fallback_once_per_ttl() {
    let origin = Arc::new(FixtureOrigin::offline());
    let control = control_plane(Arc::clone(&origin));

    let listing = control.list_articles(&ArticleFilter::default()).await;
    assert_eq!(listing.total, 3);
    assert!(listing.articles.iter().all(|article| article.url.starts_with(BASE_URL)));

    let _ = control.list_authors().await;
    let _ = control.search("governance").await;
    assert_eq!(origin.feed_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispatcher_reports_not_found_and_unknown_tools() {
    let origin = Arc::new(FixtureOrigin::new());
    let catalog = ToolDispatcher::new(ToolProfile::Catalog, control_plane(Arc::clone(&origin)));
    let search = ToolDispatcher::new(ToolProfile::Search, control_plane(origin));

    let missing = catalog
        .call("read_article", json!({"articleId": "a3"}))
        .await
        .expect_err("a3 is not in the catalog");
    assert!(matches!(missing, ToolError::NotFound(_)));

    let missing = search
        .call("fetch", json!({"id": "a3"}))
        .await
        .expect_err("a3 is not in the catalog");
    assert!(matches!(missing, ToolError::NotFound(_)));

    let unknown = catalog
        .call("search", json!({"query": "roi"}))
        .await
        .expect_err("search is not a catalog tool");
    assert_eq!(unknown, ToolError::UnknownTool("search".to_string()));

    let output = search
        .call("search", json!({"query": "roi"}))
        .await
        .expect("search should run");
    let ToolOutput::Search(results) = output else {
        panic!("expected search results");
    };
    assert_eq!(results.results.len(), 2);
}
