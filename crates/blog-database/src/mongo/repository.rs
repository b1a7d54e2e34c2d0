//! Generic MongoDB repository.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Collection, Database};
use serde_json::Value;
use tracing::debug;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::{Entity, ID_FIELD, Projectable, Repository};
use blog_core::types::{HealthCheckResult, PagedList, Projection, Query};

use super::filter::{self, MONGO_ID_FIELD};
use crate::document::{from_document, prepare};

/// Repository for one entity type, stored in the collection named by `E::COLLECTION`.
#[derive(Debug)]
pub struct MongoRepository<E> {
    database: Database,
    collection: Collection<Document>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MongoRepository<E> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> MongoRepository<E> {
    /// Create a repository on the given database.
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(E::COLLECTION),
            _entity: PhantomData,
        }
    }

    fn map_err(message: &'static str) -> impl Fn(mongodb::error::Error) -> AppError {
        move |e| AppError::with_source(ErrorKind::Database, format!("{message}: {e}"), e)
    }

    fn new_id() -> String {
        ObjectId::new().to_hex()
    }
}

/// Convert an entity document into a BSON document keyed by `_id`.
pub fn to_mongo(id: &str, mut document: Value) -> AppResult<Document> {
    if let Some(object) = document.as_object_mut() {
        object.remove(ID_FIELD);
    }
    let mut bson = mongodb::bson::to_document(&document).map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Failed to encode BSON document", e)
    })?;
    bson.insert(MONGO_ID_FIELD, id);
    Ok(bson)
}

/// Convert a stored BSON document back into an entity document keyed by `id`.
pub fn from_mongo(mut document: Document) -> AppResult<Value> {
    let id = document.remove(MONGO_ID_FIELD);
    let mut value: Value = mongodb::bson::from_document(document).map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Failed to decode BSON document", e)
    })?;

    if let (Some(object), Some(id)) = (value.as_object_mut(), id) {
        let id = match id {
            Bson::String(s) => s,
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        object.insert(ID_FIELD.to_string(), Value::String(id));
    }
    Ok(value)
}

#[async_trait]
impl<E: Entity> Repository<E> for MongoRepository<E> {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<E>> {
        let document = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(Self::map_err("Failed to find document"))?;

        document
            .map(|document| from_document(from_mongo(document)?))
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
        projection.validate()?;
        let filter = filter::filter_document(&query.filters);

        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(Self::map_err("Failed to count documents"))?;
        if total == 0 {
            return Ok(PagedList::empty());
        }

        let mut find = self.collection.find(filter);
        if let Some(order) = &query.order_by {
            find = find.sort(filter::sort_document(order));
        }
        if query.page.offset() > 0 {
            find = find.skip(query.page.offset());
        }
        if !query.page.is_unbounded() {
            find = find.limit(query.page.limit() as i64);
        }
        if let Some(fields) = filter::projection_document(projection) {
            find = find.projection(fields);
        }

        let documents: Vec<Document> = find
            .await
            .map_err(Self::map_err("Failed to list documents"))?
            .try_collect()
            .await
            .map_err(Self::map_err("Failed to read documents"))?;

        let items = documents
            .into_iter()
            .map(|document| from_document(from_mongo(document)?))
            .collect::<AppResult<Vec<P>>>()?;
        Ok(PagedList::for_request(items, total, &query.page))
    }

    async fn store(&self, entity: &mut E) -> AppResult<String> {
        let (id, document) = prepare(entity, Self::new_id)?;
        let document = to_mongo(&id, document)?;

        self.collection
            .replace_one(doc! { "_id": id.as_str() }, document)
            .upsert(true)
            .await
            .map_err(Self::map_err("Failed to store document"))?;
        Ok(id)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(Self::map_err("Failed to delete document"))?;
        Ok(())
    }

    async fn delete_bulk(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(Self::map_err("Failed to delete documents"))?;
        debug!(
            collection = E::COLLECTION,
            requested = ids.len(),
            deleted = result.deleted_count,
            "Deleted documents"
        );
        Ok(())
    }

    async fn store_bulk(&self, entities: &mut [E]) -> AppResult<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let documents = entities
            .iter_mut()
            .map(|entity| {
                let (id, document) = prepare(entity, Self::new_id)?;
                to_mongo(&id, document)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let result = self
            .collection
            .insert_many(documents)
            .await
            .map_err(Self::map_err("Failed to store documents"))?;
        debug!(
            collection = E::COLLECTION,
            count = result.inserted_ids.len(),
            "Stored documents"
        );
        Ok(())
    }

    async fn health_check(&self) -> HealthCheckResult {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(Self::map_err("Health check failed"))
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_is_stored_as_underscore_id() {
        let document = to_mongo("abc", json!({"id": "abc", "title": "Hello"})).unwrap();
        assert_eq!(document, doc! { "title": "Hello", "_id": "abc" });
    }

    #[test]
    fn test_from_mongo_restores_id() {
        let oid = ObjectId::new();
        let value = from_mongo(doc! { "_id": oid, "likes": 3_i64, "tags": ["a"] }).unwrap();
        assert_eq!(value, json!({"likes": 3, "tags": ["a"], "id": oid.to_hex()}));
    }

    #[test]
    fn test_generated_ids_are_object_id_hex() {
        let id = MongoRepository::<blog_entity::Talk>::new_id();
        assert_eq!(id.len(), 24);
        assert!(ObjectId::parse_str(&id).is_ok());
    }
}
