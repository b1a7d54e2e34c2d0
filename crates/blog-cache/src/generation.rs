//! Per-collection generation counters for coarse cache invalidation.

use std::sync::{Arc, LazyLock};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Generation counters shared by every cached repository in a process.
///
/// Reads embed the current generation of their collection in the cache
/// key; a successful write bumps it, which makes every older entry of that
/// collection unaddressable. The epoch is unique per process so processes
/// sharing a Redis cache never read each other's entries.
#[derive(Debug, Clone)]
pub struct CacheGenerations {
    epoch: Arc<str>,
    counters: Arc<DashMap<String, AtomicU64>>,
}

static PROCESS_GENERATIONS: LazyLock<CacheGenerations> = LazyLock::new(CacheGenerations::new);

impl CacheGenerations {
    /// The counters shared by the whole process.
    pub fn global() -> Self {
        PROCESS_GENERATIONS.clone()
    }

    /// Create counters with a fresh random epoch.
    pub fn new() -> Self {
        Self::with_epoch(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Create counters with a fixed epoch.
    pub fn with_epoch(epoch: impl Into<String>) -> Self {
        Self {
            epoch: Arc::from(epoch.into()),
            counters: Arc::new(DashMap::new()),
        }
    }

    /// This process's epoch.
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Current generation of `collection`.
    pub fn current(&self, collection: &str) -> u64 {
        self.counters
            .get(collection)
            .map(|counter| counter.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Advance the generation of `collection`, returning the previous one.
    pub fn bump(&self, collection: &str) -> u64 {
        self.counters
            .entry(collection.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::AcqRel)
    }
}

impl Default for CacheGenerations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_per_collection() {
        let generations = CacheGenerations::with_epoch("test");
        assert_eq!(generations.current("blog_posts"), 0);

        assert_eq!(generations.bump("blog_posts"), 0);
        assert_eq!(generations.bump("blog_posts"), 1);
        assert_eq!(generations.current("blog_posts"), 2);
        assert_eq!(generations.current("skills"), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let generations = CacheGenerations::new();
        let clone = generations.clone();
        clone.bump("talks");
        assert_eq!(generations.current("talks"), 1);
        assert_eq!(generations.epoch(), clone.epoch());
    }

    #[test]
    fn test_global_is_shared() {
        assert_eq!(CacheGenerations::global().epoch(), CacheGenerations::global().epoch());
    }

    #[test]
    fn test_epochs_differ_between_instances() {
        assert_ne!(CacheGenerations::new().epoch(), CacheGenerations::new().epoch());
    }
}
