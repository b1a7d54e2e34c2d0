//! Process-local document store.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use blog_core::result::AppResult;
use blog_core::traits::{Entity, Projectable, Repository};
use blog_core::types::{HealthCheckResult, PagedList, Projection, Query};

use crate::document::{from_document, new_id, prepare};
use crate::evaluate;

type Collection = Arc<DashMap<String, Value>>;

/// Shared in-memory storage, one document map per collection.
///
/// Cloning the store shares the underlying maps, so every repository
/// handed out for the same entity type sees the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<&'static str, Collection>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the repository for entity type `E`.
    pub fn repository<E: Entity>(&self) -> MemoryRepository<E> {
        let documents = self
            .collections
            .entry(E::COLLECTION)
            .or_insert_with(|| Arc::new(DashMap::new()))
            .clone();
        MemoryRepository {
            documents,
            _entity: PhantomData,
        }
    }
}

/// Repository over an in-memory document map.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    documents: Collection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    /// Create a standalone repository with its own storage.
    pub fn new() -> Self {
        MemoryStore::new().repository()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn snapshot(&self) -> Vec<Value> {
        let mut entries: Vec<(String, Value)> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        // DashMap iteration order is arbitrary; id order gives a stable natural order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, document)| document).collect()
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>> {
        self.documents
            .get(id)
            .map(|document| from_document(document.value().clone()))
            .transpose()
    }

    async fn get_all_by_projection<P>(
        &self,
        projection: &Projection,
        query: &Query,
    ) -> AppResult<PagedList<P>>
    where
        P: Projectable,
    {
        evaluate::execute(self.snapshot(), projection, query)
    }

    async fn store(&self, entity: &mut E) -> AppResult<String> {
        let (id, document) = prepare(entity, new_id)?;
        self.documents.insert(id.clone(), document);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.documents.remove(id);
        Ok(())
    }

    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
        for id in ids {
            self.documents.remove(id);
        }
        debug!(collection = E::COLLECTION, count = ids.len(), "Deleted documents");
        Ok(())
    }

    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()> {
        let prepared = entities
            .iter_mut()
            .map(|entity| prepare(entity, new_id))
            .collect::<AppResult<Vec<_>>>()?;
        let count = prepared.len();
        for (id, document) in prepared {
            self.documents.insert(id, document);
        }
        debug!(collection = E::COLLECTION, count, "Stored documents");
        Ok(())
    }

    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy_with("in-memory store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::types::FilterField;
    use blog_entity::{BlogPost, CreateBlogPost, ProficiencyLevel, Skill};
    use chrono::{Duration, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    fn post(title: &str, days: i64, tags: &[&str], published: bool) -> BlogPost {
        BlogPost::create(CreateBlogPost {
            title: title.to_string(),
            short_description: format!("About {title}"),
            content: "Some content".to_string(),
            preview_image_url: "https://img/p.png".to_string(),
            is_published: published,
            updated_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..CreateBlogPost::default()
        })
        .unwrap()
    }

    async fn seeded(count: i64) -> MemoryRepository<BlogPost> {
        let repo = MemoryRepository::<BlogPost>::new();
        let mut posts: Vec<BlogPost> = (0..count)
            .map(|i| post(&format!("Post {i}"), i, &["rust"], true))
            .collect();
        repo.store_bulk(&mut posts).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_store_assigns_id_and_round_trips() {
        let repo = MemoryRepository::<BlogPost>::new();
        let mut entity = post("Hello", 0, &["rust"], true);
        let id = repo.store(&mut entity).await.unwrap();

        assert!(!id.is_empty());
        assert_eq!(entity.id.as_deref(), Some(id.as_str()));
        assert_eq!(repo.get_by_id(&id).await.unwrap(), Some(entity));
    }

    #[tokio::test]
    async fn test_store_with_existing_id_replaces() {
        let repo = MemoryRepository::<BlogPost>::new();
        let mut entity = post("Before", 0, &["a"], false);
        let id = repo.store(&mut entity).await.unwrap();

        let mut replacement = post("After", 1, &[], true);
        replacement.id = Some(id.clone());
        assert_eq!(repo.store(&mut replacement).await.unwrap(), id);

        let loaded = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "After");
        assert!(loaded.tags.is_empty());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_and_delete_are_quiet() {
        let repo = MemoryRepository::<BlogPost>::new();
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
        repo.delete("nope").await.unwrap();
        repo.delete_bulk(&[]).await.unwrap();
        repo.store_bulk(&mut []).await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_store_bulk_then_get_all_returns_every_record() {
        let repo = seeded(25).await;
        let page = repo.get_all(&Query::new().paged(1, 100)).await.unwrap();
        assert_eq!(page.count(), 25);

        let mut ids: Vec<_> = page.iter().filter_map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }

    #[tokio::test]
    async fn test_five_posts_paged_by_two() {
        let repo = seeded(5).await;
        let query = Query::new().order_by("updated_date");

        let last = repo.get_all(&query.clone().paged(3, 2)).await.unwrap();
        assert_eq!(last.count(), 1);
        assert!(last.is_last_page());
        assert!(!last.is_first_page());
        assert_eq!(last[0].title, "Post 0");

        let first = repo.get_all(&query.paged(1, 2)).await.unwrap();
        assert_eq!(first.count(), 2);
        assert!(first.is_first_page());
        assert!(!first.is_last_page());
        assert_eq!(first[0].title, "Post 4");
    }

    #[tokio::test]
    async fn test_order_by_date_is_chronological_across_precisions() {
        let repo = MemoryRepository::<BlogPost>::new();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        for (title, offset) in [
            ("whole", Duration::zero()),
            ("millis", Duration::milliseconds(123)),
            ("micros", Duration::microseconds(123_456)),
            ("half", Duration::milliseconds(500)),
        ] {
            let mut entity = post(title, 0, &[], true);
            entity.updated_date = base + offset;
            repo.store(&mut entity).await.unwrap();
        }

        let page = repo.get_all(&Query::new().order_by("updated_date")).await.unwrap();
        let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["half", "micros", "millis", "whole"]);
    }

    #[tokio::test]
    async fn test_delete_bulk_removes_listed_ids() {
        let repo = seeded(4).await;
        let all = repo.get_all(&Query::new()).await.unwrap();
        let doomed: Vec<String> = all.iter().take(3).filter_map(|p| p.id.clone()).collect();

        repo.delete_bulk(&doomed).await.unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_projection_into_partial_type() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Title {
            title: String,
        }

        let repo = seeded(3).await;
        let query = Query::new()
            .filter(FilterField::like("title", "Post _"))
            .order_by_asc("updated_date");
        let page = repo
            .get_all_by_projection::<Title>(&Projection::fields(["title"]), &query)
            .await
            .unwrap();
        let titles: Vec<_> = page.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 0", "Post 1", "Post 2"]);
    }

    #[tokio::test]
    async fn test_repositories_from_one_store_share_data() {
        let store = MemoryStore::new();
        let mut skill =
            Skill::create("Rust", None, "Backend", ProficiencyLevel::Expert).unwrap();
        let id = store.repository::<Skill>().store(&mut skill).await.unwrap();

        assert!(store.repository::<Skill>().get_by_id(&id).await.unwrap().is_some());
        assert!(store.repository::<BlogPost>().is_empty());
    }

    #[tokio::test]
    async fn test_health_check_is_healthy() {
        let repo = MemoryRepository::<BlogPost>::new();
        assert!(repo.health_check().await.is_healthy());
    }
}
