use std::sync::Arc;

use pubfeed_core::control::CatalogControlPlane;
use pubfeed_core::origin::{HttpOrigin, OriginConfig, OriginError};
use pubfeed_core::registry::ToolDispatcher;
use pubfeed_core::services::{CatalogCache, CatalogCacheConfig};

use crate::config::PubfeedConfig;

/// Wires origin, cache, and query engine into the dispatcher every front end shares.
pub fn build_dispatcher(config: &PubfeedConfig) -> Result<Arc<ToolDispatcher>, OriginError> {
    let origin_config = OriginConfig::new(config.feed_url.as_str()).with_timeout(config.fetch_timeout);
    let origin = Arc::new(HttpOrigin::new(origin_config)?);

    let cache_config = CatalogCacheConfig::new().with_ttl(config.cache_ttl);
    let cache = Arc::new(CatalogCache::new(origin, cache_config));

    let control = CatalogControlPlane::new(cache);
    Ok(Arc::new(ToolDispatcher::new(config.profile, control)))
}
