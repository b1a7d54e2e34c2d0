//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod blog;
pub mod cache;
pub mod database;
pub mod document;
pub mod logging;
pub mod persistence;

use serde::{Deserialize, Serialize};

pub use self::blog::BlogConfig;
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::document::{MongoConfig, RedisStoreConfig};
pub use self::logging::LoggingConfig;
pub use self::persistence::{PersistenceConfig, StorageProvider};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which store backs the repositories and how they batch.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// PostgreSQL connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// MongoDB connection settings.
    #[serde(default)]
    pub mongodb: MongoConfig,
    /// Redis document store settings.
    #[serde(default)]
    pub redis: RedisStoreConfig,
    /// Read cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Site settings.
    #[serde(default)]
    pub blog: BlogConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file with an environment-specific overlay
    /// (`config/{BLOG_ENV}`) and environment variables prefixed with
    /// `BLOG__`. Missing files are skipped.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("BLOG_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BLOG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-section invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.persistence.batch_size == 0 {
            return Err(AppError::configuration(
                "persistence.batch_size must be greater than zero",
            ));
        }

        let missing = match self.persistence.provider {
            StorageProvider::Postgres => self.database.url.is_empty().then_some("database.url"),
            StorageProvider::MongoDb => self.mongodb.url.is_empty().then_some("mongodb.url"),
            StorageProvider::Redis => self.redis.url.is_empty().then_some("redis.url"),
            StorageProvider::Memory => None,
        };
        if let Some(field) = missing {
            return Err(AppError::configuration(format!(
                "{field} is required when persistence.provider = '{}'",
                self.persistence.provider
            )));
        }
        Ok(())
    }
}
