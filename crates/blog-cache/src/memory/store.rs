//! In-memory cache implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use blog_core::config::cache::MemoryCacheConfig;
use blog_core::result::AppResult;
use blog_core::traits::CacheProvider;

/// In-memory cache provider using moka.
///
/// Entries expire after the shorter of the configured cache-level TTL and
/// the default TTL.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, String>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        let ttl = config.time_to_live_seconds.min(default_ttl_seconds).max(1);
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(ttl))
            .build();

        Self { cache }
    }

    /// Number of live entries, after pending maintenance has run.
    #[cfg(test)]
    async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        // Only trailing-wildcard patterns are supported: match on the prefix.
        let prefix = pattern.trim_end_matches('*');

        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.to_string())
            .collect();

        let count = keys.len() as u64;
        for key in keys {
            self.cache.remove(&key).await;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        let config = MemoryCacheConfig {
            max_capacity: 1000,
            time_to_live_seconds: 60,
        };
        MemoryCacheProvider::new(&config, 60)
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider.set_default("key1", "value1").await.unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
        assert_eq!(provider.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_pattern_keeps_other_prefixes() {
        let provider = make_provider();
        provider.set_default("blog:posts:e:1:id:a", "a").await.unwrap();
        provider.set_default("blog:posts:e:1:list:x", "x").await.unwrap();
        provider.set_default("blog:posts:e:2:id:a", "b").await.unwrap();

        let removed = provider.delete_pattern("blog:posts:e:1:*").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(provider.get("blog:posts:e:1:id:a").await.unwrap(), None);
        assert!(provider.get("blog:posts:e:2:id:a").await.unwrap().is_some());
        assert_eq!(provider.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(make_provider().health_check().await.unwrap());
    }
}
