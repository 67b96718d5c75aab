//! Result cache abstraction

use crate::domain::{PagedPatients, Result, SortDirection, SortField};
use async_trait::async_trait;
use std::fmt;

/// Key for a cached browse page
///
/// Only unfiltered browse results are cached, so the key is the page
/// coordinates plus the normalized sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    pub direction: SortDirection,
    pub field: SortField,
}

impl CacheKey {
    pub fn new(page: u32, size: u32, direction: SortDirection, field: SortField) -> Self {
        Self {
            page,
            size,
            direction,
            field,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.page, self.size, self.direction, self.field)
    }
}

/// Cache for browse results
///
/// Errors are reported as `PatientError::Cache`; callers treat them as a miss.
///
/// Every `invalidate_all` starts a new generation. A reader captures the
/// generation before querying the store and passes it to `put`, so a page
/// read before a mutation is never stored after that mutation's invalidation.
#[async_trait]
pub trait ResultCache: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &CacheKey) -> Result<Option<PagedPatients>>;

    /// Current generation
    async fn generation(&self) -> Result<u64>;

    /// Store `value` if no invalidation happened since `generation` was read
    ///
    /// Returns `false` when the value was discarded as stale.
    async fn put(&self, key: CacheKey, generation: u64, value: PagedPatients) -> Result<bool>;

    /// Drop every cached page and start a new generation
    async fn invalidate_all(&self) -> Result<()>;
}
