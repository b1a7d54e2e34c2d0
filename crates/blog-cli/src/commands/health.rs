//! Store and cache health CLI command.

use serde::Serialize;

use crate::output::{self, OutputFormat};
use blog_cache::CacheManager;
use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_core::traits::CacheProvider;
use blog_core::types::HealthCheckResult;
use blog_database::StorageConnection;
use blog_entity::BlogPost;
use blog_service::DatabaseHealthCheck;

/// Health of every configured back end.
#[derive(Debug, Serialize)]
struct HealthReport {
    /// The store answering repository calls.
    store: HealthCheckResult,
    /// The read cache, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<HealthCheckResult>,
}

/// Probe the configured store and cache, failing when either does not answer.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let connection = StorageConnection::connect(config).await?;
    let check = DatabaseHealthCheck::new(connection.repository::<BlogPost>());
    let report = HealthReport {
        store: check.check().await,
        cache: if config.persistence.cache_enabled {
            Some(cache_health(config).await)
        } else {
            None
        },
    };

    if format == OutputFormat::Json {
        output::print_item(&report, format);
    } else {
        if report.store.is_healthy() {
            output::print_success(&format!("Store '{}' is healthy", connection.provider()));
        }
        if report.cache.as_ref().is_some_and(HealthCheckResult::is_healthy) {
            output::print_success(&format!("Cache '{}' is healthy", config.cache.provider));
        }
    }

    let failure = report
        .store
        .error()
        .or_else(|| report.cache.as_ref().and_then(HealthCheckResult::error));
    match failure {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

async fn cache_health(config: &AppConfig) -> HealthCheckResult {
    probe_cache(config).await.into()
}

async fn probe_cache(config: &AppConfig) -> Result<(), AppError> {
    let cache = CacheManager::new(&config.cache).await?;
    if cache.health_check().await? {
        Ok(())
    } else {
        Err(AppError::cache("Cache did not answer the probe"))
    }
}
