//! Paged and search queries
//!
//! Browse queries (no search term) go through the result cache; search
//! queries always hit the record store and are never cached.

use super::orchestrator::PatientOrchestrator;
use crate::adapters::cache::CacheKey;
use crate::domain::{
    ListQuery, PageRequest, PagedPatients, PatientError, Result, Sort, SortDirection, SortField,
};

impl PatientOrchestrator {
    /// List one page of patients
    ///
    /// `query.page` is 1-based. A blank search term browses all patients;
    /// otherwise names are matched case-insensitively by substring.
    ///
    /// # Errors
    ///
    /// - `PatientError::Validation` for an out-of-range page or size, or an unknown sort field
    /// - `PatientError::Storage` if the store query fails
    pub async fn list_patients(&self, query: &ListQuery) -> Result<PagedPatients> {
        let request = self.page_request(query)?;

        match query.search_term() {
            Some(term) => {
                tracing::debug!(term, page = query.page, "Searching patients by name");
                let page = self
                    .store
                    .find_page_by_name_containing(term, &request)
                    .await?;
                Ok(PagedPatients::from(page))
            }
            None => self.browse(query.page, request).await,
        }
    }

    async fn browse(&self, page: u32, request: PageRequest) -> Result<PagedPatients> {
        let key = CacheKey::new(page, request.size, request.sort.direction, request.sort.field);

        // Captured before the store read; a later invalidation makes the put a no-op
        let mut generation = None;
        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(hit)) => {
                    tracing::debug!(key = %key, "Result cache hit");
                    return Ok(hit);
                }
                Ok(None) => tracing::debug!(key = %key, "Result cache miss"),
                Err(e) => tracing::warn!(key = %key, error = %e, "Result cache read failed"),
            }
            match cache.generation().await {
                Ok(current) => generation = Some(current),
                Err(e) => tracing::warn!(key = %key, error = %e, "Result cache generation unavailable"),
            }
        }

        let result = PagedPatients::from(self.store.find_page(&request).await?);

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            match cache.put(key, generation, result.clone()).await {
                Ok(true) => {}
                Ok(false) => tracing::debug!(key = %key, "Result cache invalidated during read"),
                Err(e) => tracing::warn!(key = %key, error = %e, "Result cache write failed"),
            }
        }

        Ok(result)
    }

    fn page_request(&self, query: &ListQuery) -> Result<PageRequest> {
        if query.page == 0 {
            return Err(PatientError::Validation(
                "page must be 1 or greater".to_string(),
            ));
        }
        if query.size == 0 || query.size > self.settings.max_page_size {
            return Err(PatientError::Validation(format!(
                "size must be between 1 and {}, got {}",
                self.settings.max_page_size, query.size
            )));
        }

        let sort = Sort::new(
            SortField::parse(&query.sort_field)?,
            SortDirection::parse_lenient(&query.sort_direction),
        );

        Ok(PageRequest::new(query.page - 1, query.size, sort))
    }
}
