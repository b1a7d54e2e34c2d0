//! Generic repository trait for entity persistence.

use std::sync::Arc;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::entity::{Entity, Projectable};
use crate::types::{HealthCheckResult, PagedList, Projection, Query};

/// Generic CRUD and query façade over one storage technology.
///
/// Every store implements the same contract so callers stay
/// storage-agnostic; the store is chosen once at startup.
///
/// Store errors propagate unchanged, except from
/// [`Repository::health_check`], which reports them as
/// [`HealthCheckResult::Unhealthy`]. Nothing in this layer retries.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Find an entity by id. A missing id yields `None`, not an error.
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>>;

    /// Filter, order and page whole entities.
    async fn get_all(&self, query: &Query) -> AppResult<PagedList<E>> {
        self.get_all_by_projection::<E>(&Projection::Identity, query)
            .await
    }

    /// Filter, order, page and project entities into `P`.
    ///
    /// Ordering happens before projection, so the sort field need not be
    /// part of the projection.
    async fn get_all_by_projection<P>(
        &self,
        projection: &Projection,
        query: &Query,
    ) -> AppResult<PagedList<P>>
    where
        P: Projectable;

    /// Insert or fully replace an entity, assigning an id when it has none.
    ///
    /// Returns the entity's id.
    async fn store(&self, entity: &mut E) -> AppResult<String>;

    /// Delete an entity by id. Deleting a missing id is a no-op.
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Delete every listed id.
    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()>;

    /// Insert every entity, assigning ids where missing.
    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()>;

    /// Run a trivial round trip against the store. Never fails.
    async fn health_check(&self) -> HealthCheckResult;
}

#[async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E>,
{
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>> {
        (**self).get_by_id(id).await
    }

    async fn get_all(&self, query: &Query) -> AppResult<PagedList<E>> {
        (**self).get_all(query).await
    }

    async fn get_all_by_projection<P>(
        &self,
        projection: &Projection,
        query: &Query,
    ) -> AppResult<PagedList<P>>
    where
        P: Projectable,
    {
        (**self).get_all_by_projection::<P>(projection, query).await
    }

    async fn store(&self, entity: &mut E) -> AppResult<String> {
        (**self).store(entity).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        (**self).delete(id).await
    }

    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
        (**self).delete_bulk(ids).await
    }

    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()> {
        (**self).store_bulk(entities).await
    }

    async fn health_check(&self) -> HealthCheckResult {
        (**self).health_check().await
    }
}
