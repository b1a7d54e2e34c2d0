//! Caching decorator for any [`Repository`].
//!
//! Single-entity and list reads are memoized in the configured cache.
//! Every mutation bumps the generation of the entity's collection, which
//! orphans all cached entries of that type; the previous generation is
//! then purged on a best-effort basis.

use std::any::type_name;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use blog_core::result::AppResult;
use blog_core::traits::{CacheProvider, Entity, Projectable, Repository};
use blog_core::types::{HealthCheckResult, PagedList, Projection, Query};

use crate::generation::CacheGenerations;
use crate::keys;
use crate::provider::CacheManager;

/// Wrap `inner` with a read cache sharing the process-wide generations.
pub fn cached<R, E>(inner: R, cache: CacheManager) -> CachedRepository<R, E>
where
    R: Repository<E>,
    E: Entity,
{
    CachedRepository::new(inner, cache, CacheGenerations::global())
}

/// Repository decorator that caches reads and invalidates on writes.
pub struct CachedRepository<R, E> {
    inner: R,
    cache: CacheManager,
    generations: CacheGenerations,
    _entity: PhantomData<fn() -> E>,
}

impl<R: Clone, E> Clone for CachedRepository<R, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: self.cache.clone(),
            generations: self.generations.clone(),
            _entity: PhantomData,
        }
    }
}

impl<R: std::fmt::Debug, E: Entity> std::fmt::Debug for CachedRepository<R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRepository")
            .field("collection", &E::COLLECTION)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<R, E> CachedRepository<R, E>
where
    R: Repository<E>,
    E: Entity,
{
    /// Create a decorator with explicit generation counters.
    pub fn new(inner: R, cache: CacheManager, generations: CacheGenerations) -> Self {
        Self {
            inner,
            cache,
            generations,
            _entity: PhantomData,
        }
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached entry of this entity type.
    pub async fn invalidate(&self) {
        let previous = self.generations.bump(E::COLLECTION);
        let pattern = keys::generation_pattern(E::COLLECTION, self.generations.epoch(), previous);
        match self.cache.delete_pattern(&pattern).await {
            Ok(purged) => debug!(
                collection = E::COLLECTION,
                generation = previous,
                purged,
                "Invalidated cache entries"
            ),
            Err(e) => warn!(
                collection = E::COLLECTION,
                generation = previous,
                error = %e,
                "Failed to purge stale cache entries"
            ),
        }
    }

    async fn read<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.set_default(key, &raw).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }
}

#[async_trait]
impl<R, E> Repository<E> for CachedRepository<R, E>
where
    R: Repository<E>,
    E: Entity,
{
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>> {
        let generation = self.generations.current(E::COLLECTION);
        let key = keys::entity_by_id(E::COLLECTION, self.generations.epoch(), generation, id);

        if let Some(entity) = self.read::<E>(&key).await {
            return Ok(Some(entity));
        }

        let entity = self.inner.get_by_id(id).await?;
        if let Some(entity) = &entity {
            self.write(&key, entity).await;
        }
        Ok(entity)
    }

    async fn get_all_by_projection<P>(
        &self,
        projection: &Projection,
        query: &Query,
    ) -> AppResult<PagedList<P>>
    where
        P: Projectable,
    {
        projection.validate()?;

        let generation = self.generations.current(E::COLLECTION);
        let key = match keys::list_fingerprint(query, projection, type_name::<P>()) {
            Ok(fingerprint) => Some(keys::entity_list(
                E::COLLECTION,
                self.generations.epoch(),
                generation,
                &fingerprint,
            )),
            Err(e) => {
                warn!(collection = E::COLLECTION, error = %e, "Failed to fingerprint query");
                None
            }
        };

        if let Some(key) = &key {
            if let Some(page) = self.read::<PagedList<P>>(key).await {
                return Ok(page);
            }
        }

        let page = self
            .inner
            .get_all_by_projection::<P>(projection, query)
            .await?;
        if let Some(key) = &key {
            self.write(key, &page).await;
        }
        Ok(page)
    }

    // Invalidate on failure too; a failed bulk write may have partially applied.

    async fn store(&self, entity: &mut E) -> AppResult<String> {
        let result = self.inner.store(entity).await;
        self.invalidate().await;
        result
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.inner.delete(id).await;
        self.invalidate().await;
        result
    }

    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let result = self.inner.delete_bulk(ids).await;
        self.invalidate().await;
        result
    }

    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let result = self.inner.store_bulk(entities).await;
        self.invalidate().await;
        result
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use blog_core::config::cache::MemoryCacheConfig;
    use blog_core::error::AppError;
    use blog_core::types::FilterField;
    use blog_database::MemoryRepository;
    use blog_entity::{BlogPost, CreateBlogPost};

    use crate::memory::MemoryCacheProvider;

    /// Memory repository that counts the reads reaching it.
    #[derive(Default)]
    struct CountingRepository {
        inner: MemoryRepository<BlogPost>,
        by_id: AtomicUsize,
        lists: AtomicUsize,
        health: AtomicUsize,
    }

    impl CountingRepository {
        fn by_id(&self) -> usize {
            self.by_id.load(Ordering::SeqCst)
        }

        fn lists(&self) -> usize {
            self.lists.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Repository<BlogPost> for CountingRepository {
        async fn get_by_id(&self, id: &str) -> AppResult<Option<BlogPost>> {
            self.by_id.fetch_add(1, Ordering::SeqCst);
            self.inner.get_by_id(id).await
        }

        async fn get_all_by_projection<P>(
            &self,
            projection: &Projection,
            query: &Query,
        ) -> AppResult<PagedList<P>>
        where
            P: Projectable,
        {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.get_all_by_projection::<P>(projection, query).await
        }

        async fn store(&self, entity: &mut BlogPost) -> AppResult<String> {
            self.inner.store(entity).await
        }

        async fn delete(&self, id: &str) -> AppResult<()> {
            self.inner.delete(id).await
        }

        async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
            self.inner.delete_bulk(ids).await
        }

        async fn store_bulk(&self, entities: &mut [BlogPost]) -> AppResult<()> {
            self.inner.store_bulk(entities).await
        }

        async fn health_check(&self) -> HealthCheckResult {
            self.health.fetch_add(1, Ordering::SeqCst);
            self.inner.health_check().await
        }
    }

    /// Cache provider whose every call fails.
    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl CacheProvider for BrokenCache {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("connection refused"))
        }

        async fn set_default(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }

        async fn delete_pattern(&self, _pattern: &str) -> AppResult<u64> {
            Err(AppError::cache("connection refused"))
        }

        async fn health_check(&self) -> AppResult<bool> {
            Err(AppError::cache("connection refused"))
        }
    }

    type Cached = CachedRepository<Arc<CountingRepository>, BlogPost>;

    fn memory_cache() -> CacheManager {
        let config = MemoryCacheConfig {
            max_capacity: 1000,
            time_to_live_seconds: 60,
        };
        CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(&config, 60)))
    }

    fn setup(cache: CacheManager) -> (Arc<CountingRepository>, Cached) {
        let counting = Arc::new(CountingRepository::default());
        let repo = CachedRepository::new(
            Arc::clone(&counting),
            cache,
            CacheGenerations::with_epoch("test"),
        );
        (counting, repo)
    }

    fn post(title: &str) -> BlogPost {
        BlogPost::create(CreateBlogPost {
            title: title.to_string(),
            content: "content".to_string(),
            is_published: true,
            tags: vec!["rust".to_string()],
            ..CreateBlogPost::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_by_id_hits_inner_once() {
        let (counting, repo) = setup(memory_cache());
        let mut entity = post("Cached");
        let id = repo.store(&mut entity).await.unwrap();

        let first = repo.get_by_id(&id).await.unwrap();
        let second = repo.get_by_id(&id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second, Some(entity));
        assert_eq!(counting.by_id(), 1);
    }

    #[tokio::test]
    async fn test_missing_entities_are_not_cached() {
        let (counting, repo) = setup(memory_cache());
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(counting.by_id(), 2);
    }

    #[tokio::test]
    async fn test_store_between_lists_forces_requery() {
        let (counting, repo) = setup(memory_cache());
        let query = Query::new().order_by("updated_date");
        repo.store(&mut post("One")).await.unwrap();

        assert_eq!(repo.get_all(&query).await.unwrap().count(), 1);
        assert_eq!(repo.get_all(&query).await.unwrap().count(), 1);
        assert_eq!(counting.lists(), 1);

        repo.store(&mut post("Two")).await.unwrap();
        assert_eq!(repo.get_all(&query).await.unwrap().count(), 2);
        assert_eq!(counting.lists(), 2);
    }

    #[tokio::test]
    async fn test_delete_invalidates_entity() {
        let (counting, repo) = setup(memory_cache());
        let id = repo.store(&mut post("Doomed")).await.unwrap();
        assert!(repo.get_by_id(&id).await.unwrap().is_some());

        repo.delete(&id).await.unwrap();
        assert!(repo.get_by_id(&id).await.unwrap().is_none());
        assert_eq!(counting.by_id(), 2);
    }

    #[tokio::test]
    async fn test_distinct_queries_do_not_collide() {
        let (counting, repo) = setup(memory_cache());
        let mut posts: Vec<_> = (0..3).map(|i| post(&format!("Post {i}"))).collect();
        repo.store_bulk(&mut posts).await.unwrap();

        let page1 = repo.get_all(&Query::new().order_by_asc("title").paged(1, 2)).await.unwrap();
        let page2 = repo.get_all(&Query::new().order_by_asc("title").paged(2, 2)).await.unwrap();
        let filtered = repo
            .get_all(&Query::new().filter(FilterField::eq("title", "Post 1")))
            .await
            .unwrap();

        assert_eq!(page1.count(), 2);
        assert_eq!(page2.count(), 1);
        assert_eq!(filtered.count(), 1);
        assert_eq!(counting.lists(), 3);
    }

    #[tokio::test]
    async fn test_projection_target_type_is_part_of_key() {
        #[derive(Debug, serde::Serialize, serde::Deserialize)]
        struct Title {
            title: String,
        }

        let (counting, repo) = setup(memory_cache());
        repo.store(&mut post("Typed")).await.unwrap();
        let projection = Projection::fields(["title"]);
        let query = Query::new();

        let titles = repo
            .get_all_by_projection::<Title>(&projection, &query)
            .await
            .unwrap();
        let raw = repo
            .get_all_by_projection::<serde_json::Value>(&projection, &query)
            .await
            .unwrap();

        assert_eq!(titles[0].title, "Typed");
        assert_eq!(raw[0]["title"], "Typed");
        assert_eq!(counting.lists(), 2);
    }

    #[tokio::test]
    async fn test_empty_projection_fails_before_inner() {
        let (counting, repo) = setup(memory_cache());
        let result = repo
            .get_all_by_projection::<serde_json::Value>(&Projection::Fields(vec![]), &Query::new())
            .await;
        assert!(result.is_err());
        assert_eq!(counting.lists(), 0);
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_inner() {
        let (counting, repo) = setup(CacheManager::from_provider(Arc::new(BrokenCache)));
        let id = repo.store(&mut post("Resilient")).await.unwrap();

        assert!(repo.get_by_id(&id).await.unwrap().is_some());
        assert!(repo.get_by_id(&id).await.unwrap().is_some());
        assert_eq!(repo.get_all(&Query::new()).await.unwrap().count(), 1);
        assert_eq!(counting.by_id(), 2);
    }

    #[tokio::test]
    async fn test_other_collections_stay_cached() {
        let cache = memory_cache();
        let generations = CacheGenerations::with_epoch("shared");
        let counting = Arc::new(CountingRepository::default());
        let posts: Cached =
            CachedRepository::new(Arc::clone(&counting), cache.clone(), generations.clone());
        let id = posts.store(&mut post("Stable")).await.unwrap();
        posts.get_by_id(&id).await.unwrap();

        generations.bump("skills");
        posts.get_by_id(&id).await.unwrap();
        assert_eq!(counting.by_id(), 1);
    }

    #[tokio::test]
    async fn test_health_check_passes_through() {
        let (counting, repo) = setup(memory_cache());
        assert!(repo.health_check().await.is_healthy());
        assert_eq!(counting.health.load(Ordering::SeqCst), 1);
    }
}
