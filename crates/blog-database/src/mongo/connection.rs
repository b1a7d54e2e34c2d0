//! MongoDB client management.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::info;

use blog_core::config::MongoConfig;
use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::Entity;

use super::repository::MongoRepository;
use crate::provider::mask_password;

/// Handle to the configured MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect and verify the server answers `ping`.
    pub async fn connect(config: &MongoConfig) -> AppResult<Self> {
        info!(
            url = %mask_password(&config.url),
            database = %config.database,
            "Connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Invalid MongoDB connection string", e)
        })?;
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options).map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create MongoDB client", e)
        })?;
        let database = client.database(&config.database);

        database.run_command(doc! { "ping": 1 }).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to connect to MongoDB: {e}"),
                e,
            )
        })?;

        info!("Successfully connected to MongoDB");
        Ok(Self { database })
    }

    /// Return the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Return the repository for entity type `E`.
    pub fn repository<E: Entity>(&self) -> MongoRepository<E> {
        MongoRepository::new(&self.database)
    }
}
