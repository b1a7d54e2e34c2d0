//! Redis connection management for the document store.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use blog_core::config::RedisStoreConfig;
use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::Entity;

use super::repository::RedisRepository;
use crate::provider::mask_password;

/// Redis connection shared by every document repository.
#[derive(Debug, Clone)]
pub struct RedisDocumentStore {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Prefix of every collection hash key.
    key_prefix: String,
}

impl RedisDocumentStore {
    /// Connect using the document store configuration.
    pub async fn connect(config: &RedisStoreConfig) -> AppResult<Self> {
        info!(url = %mask_password(&config.url), "Connecting to Redis document store");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create Redis client", e)
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to connect to Redis", e)
        })?;

        info!("Successfully connected to Redis document store");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Hash key holding the documents of `collection`.
    pub fn collection_key(&self, collection: &str) -> String {
        format!("{}{collection}", self.key_prefix)
    }

    /// Return the repository for entity type `E`.
    pub fn repository<E: Entity>(&self) -> RedisRepository<E> {
        RedisRepository::new(self.conn.clone(), self.collection_key(E::COLLECTION))
    }
}
