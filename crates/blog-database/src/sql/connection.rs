//! PostgreSQL connection pool management.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use blog_core::config::DatabaseConfig;
use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::Entity;

use super::repository::SqlRepository;
use crate::provider::mask_password;

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
    batch_size: usize,
}

impl DatabasePool {
    /// Connect using the pool settings and the bulk batch size.
    pub async fn connect(config: &DatabaseConfig, batch_size: usize) -> AppResult<Self> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to PostgreSQL");
        Ok(Self { pool, batch_size })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Return the repository for entity type `E`.
    pub fn repository<E: Entity>(&self) -> SqlRepository<E> {
        SqlRepository::new(self.pool.clone(), self.batch_size)
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
