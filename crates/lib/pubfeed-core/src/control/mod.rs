//! Query engine over the cached catalog.
//!
//! Every operation reads one snapshot for its whole duration and never
//! mutates it. The pure functions in [`listing`] and [`reading`] take the
//! article slice directly so they can be tested without a cache.

use std::{error::Error, fmt, sync::Arc};

use crate::extract::ContentExtractor;
use crate::services::{CatalogCache, CatalogSnapshot};

pub mod listing;
pub mod reading;

pub use listing::ArticleFilter;
pub use reading::ArticleSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    NotFound(String),
    InvalidArgument(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(message) | Self::InvalidArgument(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ControlError {}

/// Entry point for catalog queries, shared by every transport.
#[derive(Clone)]
pub struct CatalogControlPlane {
    cache: Arc<CatalogCache>,
    extractor: ContentExtractor,
}

impl CatalogControlPlane {
    #[must_use]
    pub fn new(cache: Arc<CatalogCache>) -> Self {
        let extractor = ContentExtractor::new(cache.origin());
        Self { cache, extractor }
    }

    #[must_use]
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.cache.snapshot().await
    }
}
