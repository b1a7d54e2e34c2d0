//! Schema management for document tables.

use sqlx::PgPool;
use tracing::info;

use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_core::traits::Entity;

use super::query::table;

/// Run all pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Create the document table for `E` if it does not exist yet.
pub async fn ensure_collection<E: Entity>(pool: &PgPool) -> AppResult<()> {
    sqlx::query(&create_table_sql(E::COLLECTION))
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create table '{}': {e}", E::COLLECTION),
                e,
            )
        })?;
    Ok(())
}

fn create_table_sql(collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, document JSONB NOT NULL)",
        table(collection)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            create_table_sql("talks"),
            "CREATE TABLE IF NOT EXISTS \"talks\" (id TEXT PRIMARY KEY, document JSONB NOT NULL)"
        );
    }
}
