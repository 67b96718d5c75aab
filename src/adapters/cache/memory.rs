//! In-process result cache

use super::traits::{CacheKey, ResultCache};
use crate::domain::{PagedPatients, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry {
    stored_at: Instant,
    value: PagedPatients,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<CacheKey, Entry>,
    generation: u64,
}

/// Bounded map of browse pages with optional expiry
///
/// When full, the oldest entry is evicted to make room. The generation lives
/// under the same lock as the entries so a stale `put` cannot interleave with
/// `invalidate_all`.
pub struct InMemoryResultCache {
    slots: RwLock<Slots>,
    ttl: Option<Duration>,
    max_entries: usize,
}

impl InMemoryResultCache {
    pub fn new(ttl: Option<Duration>, max_entries: usize) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<PagedPatients>> {
        {
            let slots = self.slots.read().await;
            match slots.entries.get(key) {
                None => return Ok(None),
                Some(entry) if !self.is_expired(entry) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut slots = self.slots.write().await;
        if slots.entries.get(key).is_some_and(|entry| self.is_expired(entry)) {
            slots.entries.remove(key);
        }
        Ok(None)
    }

    async fn generation(&self) -> Result<u64> {
        Ok(self.slots.read().await.generation)
    }

    async fn put(&self, key: CacheKey, generation: u64, value: PagedPatients) -> Result<bool> {
        let mut slots = self.slots.write().await;

        if slots.generation != generation {
            tracing::debug!(
                key = %key,
                read_generation = generation,
                current_generation = slots.generation,
                "Discarding page read before invalidation"
            );
            return Ok(false);
        }

        if !slots.entries.contains_key(&key) && slots.entries.len() >= self.max_entries {
            let oldest = slots
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                slots.entries.remove(&oldest);
            }
        }

        slots.entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
        Ok(true)
    }

    async fn invalidate_all(&self) -> Result<()> {
        let mut slots = self.slots.write().await;
        let dropped = slots.entries.len();
        slots.entries.clear();
        slots.generation = slots.generation.wrapping_add(1);
        tracing::debug!(dropped, generation = slots.generation, "Result cache invalidated");
        Ok(())
    }
}
