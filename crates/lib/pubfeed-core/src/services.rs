use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pubfeed_store::models::Article;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::origin::Origin;
use crate::parsers::RssFeedParser;

pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(300);

/// Configuration for the catalog cache.
#[derive(Debug, Clone)]
pub struct CatalogCacheConfig {
    pub ttl: Duration,
}

impl CatalogCacheConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl: DEFAULT_CATALOG_TTL,
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a snapshot's articles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Origin,
    Fallback,
    Seeded,
}

/// Immutable point-in-time catalog. Replaced wholesale, never patched.
#[derive(Debug)]
pub struct CatalogSnapshot {
    articles: Vec<Article>,
    fetched_at: DateTime<Utc>,
    loaded_at: Instant,
    source: SnapshotSource,
}

impl CatalogSnapshot {
    fn new(articles: Vec<Article>, source: SnapshotSource) -> Self {
        Self {
            articles,
            fetched_at: Utc::now(),
            loaded_at: Instant::now(),
            source,
        }
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    #[must_use]
    pub const fn source(&self) -> SnapshotSource {
        self.source
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }
}

/// Read-through cache owning the single in-process catalog.
///
/// Readers receive an `Arc` to a snapshot, so articles and timestamp are
/// always observed together. Concurrent refreshes may both hit the origin;
/// the last one to finish wins.
pub struct CatalogCache {
    origin: Arc<dyn Origin>,
    config: CatalogCacheConfig,
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(origin: Arc<dyn Origin>, config: CatalogCacheConfig) -> Self {
        Self {
            origin,
            config,
            current: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn origin(&self) -> Arc<dyn Origin> {
        Arc::clone(&self.origin)
    }

    /// Returns the current snapshot, refreshing it first when absent or stale.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let cached = self.current.read().await.clone();
        if let Some(snapshot) = cached
            && snapshot.is_fresh(self.config.ttl)
        {
            debug!(articles = snapshot.articles.len(), "serving cached catalog");
            return snapshot;
        }

        let snapshot = Arc::new(self.load().await);
        *self.current.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Installs `articles` as the current snapshot, subject to the same TTL.
    pub async fn seed(&self, articles: Vec<Article>) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(CatalogSnapshot::new(articles, SnapshotSource::Seeded));
        *self.current.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    async fn load(&self) -> CatalogSnapshot {
        let fetched = match self.origin.fetch_feed().await {
            Ok(xml) => RssFeedParser::parse(&xml).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match fetched {
            Ok(articles) => {
                info!(articles = articles.len(), "catalog refreshed from origin");
                CatalogSnapshot::new(articles, SnapshotSource::Origin)
            }
            Err(message) => {
                warn!(error = %message, "origin feed unavailable, serving fallback catalog");
                CatalogSnapshot::new(
                    fallback_articles(self.origin.base_url(), Utc::now()),
                    SnapshotSource::Fallback,
                )
            }
        }
    }
}

/// Fixed catalog served while the origin is unreachable.
#[must_use]
pub fn fallback_articles(base_url: &str, now: DateTime<Utc>) -> Vec<Article> {
    let entry = |id: &str, title: &str, author: &str, days_ago: i64, slug: &str, excerpt: &str, topics: &[&str]| {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            published_date: (now - chrono::Duration::days(days_ago)).to_rfc3339(),
            url: format!("{base_url}/p/{slug}"),
            excerpt: excerpt.to_string(),
            topics: topics.iter().map(|topic| (*topic).to_string()).collect(),
        }
    };

    vec![
        entry(
            "mock-1",
            "Getting Started with AI Center of Excellence",
            "AI CoE Team",
            0,
            "getting-started-with-ai-coe",
            "Learn how to establish and run an effective AI Center of Excellence in your organization...",
            &["AI Strategy", "Organization", "Getting Started"],
        ),
        entry(
            "mock-2",
            "Best Practices for AI Governance",
            "Dr. Sarah Johnson",
            1,
            "ai-governance-best-practices",
            "Implementing robust AI governance frameworks to ensure responsible AI deployment...",
            &["AI Governance", "Ethics", "Compliance"],
        ),
        entry(
            "mock-3",
            "Measuring ROI of AI Initiatives",
            "Michael Chen",
            2,
            "measuring-ai-roi",
            "Key metrics and methodologies for tracking the return on investment of AI projects...",
            &["ROI", "Metrics", "Business Value"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::origin::{OriginError, OriginFuture};

    const FEED: &str = r#"<rss version="2.0"><channel>
        <item><title>First</title><link>https://example.com/p/first</link></item>
        <item><title>Second</title><link>https://example.com/p/second</link></item>
    </channel></rss>"#;

    struct CountingOrigin {
        calls: AtomicUsize,
        feed: Option<&'static str>,
    }

    impl CountingOrigin {
        fn serving(feed: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                feed: Some(feed),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                feed: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Origin for CountingOrigin {
        fn base_url(&self) -> &str {
            "https://example.com"
        }

        fn fetch_feed(&self) -> OriginFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.feed.map(str::to_string).ok_or_else(|| OriginError::Status {
                url: "https://example.com/feed".to_string(),
                status: 503,
            });
            Box::pin(async move { result })
        }

        fn fetch_page<'a>(&'a self, url: &'a str) -> OriginFuture<'a> {
            Box::pin(async move {
                Err(OriginError::Request {
                    url: url.to_string(),
                    message: "offline".to_string(),
                })
            })
        }
    }

    fn cache(origin: Arc<CountingOrigin>, ttl: Duration) -> CatalogCache {
        CatalogCache::new(origin, CatalogCacheConfig::new().with_ttl(ttl))
    }

    #[tokio::test(start_paused = true)]
    async fn reads_within_ttl_do_not_refetch() {
        let origin = CountingOrigin::serving(FEED);
        let cache = cache(origin.clone(), Duration::from_secs(300));

        let first = cache.snapshot().await;
        let second = cache.snapshot().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(origin.calls(), 1);
        assert_eq!(first.source(), SnapshotSource::Origin);
        assert_eq!(first.articles().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_snapshots_are_replaced() {
        let origin = CountingOrigin::serving(FEED);
        let cache = cache(origin.clone(), Duration::from_secs(300));

        let first = cache.snapshot().await;
        tokio::time::advance(Duration::from_secs(301)).await;
        let second = cache.snapshot().await;

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(origin.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn origin_failure_serves_fallback_without_retry_storm() {
        let origin = CountingOrigin::failing();
        let cache = cache(origin.clone(), Duration::from_secs(300));

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.source(), SnapshotSource::Fallback);
        assert!(!snapshot.articles().is_empty());
        assert!(
            snapshot
                .articles()
                .iter()
                .all(|article| !article.title.is_empty() && !article.url.is_empty())
        );

        let _ = cache.snapshot().await;
        assert_eq!(origin.calls(), 1);

        tokio::time::advance(Duration::from_secs(300)).await;
        let _ = cache.snapshot().await;
        assert_eq!(origin.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_feed_serves_fallback() {
        let origin = CountingOrigin::serving("<rss><channel>");
        let cache = cache(origin, Duration::from_secs(300));

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.source(), SnapshotSource::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_feed_is_cached_not_treated_as_failure() {
        let origin = CountingOrigin::serving("<rss><channel></channel></rss>");
        let cache = cache(origin.clone(), Duration::from_secs(300));

        let snapshot = cache.snapshot().await;
        assert_eq!(snapshot.source(), SnapshotSource::Origin);
        assert!(snapshot.articles().is_empty());

        let _ = cache.snapshot().await;
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_snapshot_is_served_until_stale() {
        let origin = CountingOrigin::serving(FEED);
        let cache = cache(origin.clone(), Duration::from_secs(60));

        let seeded = cache
            .seed(fallback_articles("https://example.com", Utc::now()))
            .await;
        let served = cache.snapshot().await;
        assert!(Arc::ptr_eq(&seeded, &served));
        assert_eq!(origin.calls(), 0);

        tokio::time::advance(Duration::from_secs(61)).await;
        let refreshed = cache.snapshot().await;
        assert_eq!(refreshed.source(), SnapshotSource::Origin);
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_readers_see_consistent_snapshots() {
        let origin = CountingOrigin::serving(FEED);
        let cache = Arc::new(cache(origin, Duration::from_secs(300)));

        let (left, right) = tokio::join!(cache.snapshot(), cache.snapshot());
        assert_eq!(left.articles(), right.articles());
        let latest = cache.snapshot().await;
        assert!(Arc::ptr_eq(&latest, &cache.snapshot().await));
    }

    #[test]
    fn fallback_catalog_is_well_formed() {
        let now = Utc::now();
        let articles = fallback_articles("https://example.com", now);
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[1].url, "https://example.com/p/ai-governance-best-practices");
        assert_eq!(articles[0].published_date, now.to_rfc3339());
        assert!(articles.iter().all(|article| !article.topics.is_empty()));
    }
}
