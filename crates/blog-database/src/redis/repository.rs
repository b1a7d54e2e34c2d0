//! Generic repository over one Redis hash per collection.
//!
//! Each hash field is an entity id and each value its JSON document.
//! Queries load the whole hash with `HVALS` and are evaluated in process.

use std::marker::PhantomData;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::debug;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::{Entity, Projectable, Repository};
use blog_core::types::{HealthCheckResult, PagedList, Projection, Query};

use crate::document::{from_document, new_id, prepare};
use crate::evaluate;

/// Repository for one entity type stored in a Redis hash.
pub struct RedisRepository<E> {
    conn: ConnectionManager,
    key: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RedisRepository<E> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            key: self.key.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for RedisRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> RedisRepository<E> {
    /// Create a repository over the hash at `key`.
    pub fn new(conn: ConnectionManager, key: String) -> Self {
        Self {
            conn,
            key,
            _entity: PhantomData,
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Database, format!("Redis error: {e}"), e)
    }

    fn parse(raw: &str) -> AppResult<serde_json::Value> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for RedisRepository<E> {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(&self.key, id).await.map_err(Self::map_err)?;
        raw.map(|raw| from_document(Self::parse(&raw)?)).transpose()
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

        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.hvals(&self.key).await.map_err(Self::map_err)?;
        let documents = raw
            .iter()
            .map(|raw| Self::parse(raw))
            .collect::<AppResult<Vec<_>>>()?;
        evaluate::execute(documents, projection, query)
    }

    async fn store(&self, entity: &mut E) -> AppResult<String> {
        let (id, document) = prepare(entity, new_id)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(&self.key, &id, document.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(id)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.hdel(&self.key, id).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let deleted: u64 = conn.hdel(&self.key, ids).await.map_err(Self::map_err)?;
        debug!(key = %self.key, requested = ids.len(), deleted, "Deleted documents");
        Ok(())
    }

    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let fields = entities
            .iter_mut()
            .map(|entity| {
                let (id, document) = prepare(entity, new_id)?;
                Ok((id, document.to_string()))
            })
            .collect::<AppResult<Vec<(String, String)>>>()?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(&self.key, &fields)
            .await
            .map_err(Self::map_err)?;
        debug!(key = %self.key, count = fields.len(), "Stored documents");
        Ok(())
    }

    async fn health_check(&self) -> HealthCheckResult {
        let mut conn = self.conn.clone();
        let pong: Result<String, redis::RedisError> = redis::cmd("PING").query_async(&mut conn).await;
        match pong {
            Ok(reply) if reply == "PONG" => HealthCheckResult::healthy(),
            Ok(reply) => HealthCheckResult::unhealthy(AppError::database(format!(
                "Unexpected PING reply: {reply}"
            ))),
            Err(e) => HealthCheckResult::unhealthy(Self::map_err(e)),
        }
    }
}
