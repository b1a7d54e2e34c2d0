//! Document store configuration (MongoDB and Redis).

use serde::{Deserialize, Serialize};

/// MongoDB connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection string.
    #[serde(default = "default_mongo_url")]
    pub url: String,
    /// Database holding one collection per entity type.
    #[serde(default = "default_database")]
    pub database: String,
    /// Application name reported to the server.
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: default_mongo_url(),
            database: default_database(),
            app_name: default_app_name(),
        }
    }
}

/// Redis document store configuration.
///
/// Independent from the Redis *cache* settings so the cache and the
/// store can live on different servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix prepended to every collection hash key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_mongo_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "blog".to_string()
}

fn default_app_name() -> String {
    "blog-engine".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "blog:doc:".to_string()
}
