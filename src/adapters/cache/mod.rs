//! Browse result cache

pub mod memory;
pub mod traits;

pub use memory::InMemoryResultCache;
pub use traits::{CacheKey, ResultCache};

use crate::config::CacheConfig;
use std::sync::Arc;

/// Create the result cache, or `None` when caching is disabled
pub fn create_result_cache(config: &CacheConfig) -> Option<Arc<dyn ResultCache + Send + Sync>> {
    if !config.enabled {
        tracing::info!("Result cache disabled");
        return None;
    }

    tracing::info!(
        ttl_seconds = config.ttl_seconds,
        max_entries = config.max_entries,
        "Creating in-memory result cache"
    );
    Some(Arc::new(InMemoryResultCache::new(
        config.ttl(),
        config.max_entries,
    )))
}
