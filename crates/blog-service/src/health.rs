//! Database health check backed by the blog post repository.

use blog_core::traits::repository::Repository;
use blog_core::types::health::HealthCheckResult;
use blog_entity::BlogPost;
use tracing::warn;

/// Reports whether the configured store answers a round trip.
#[derive(Debug, Clone)]
pub struct DatabaseHealthCheck<R> {
    repository: R,
}

impl<R: Repository<BlogPost>> DatabaseHealthCheck<R> {
    /// Create a health check over the blog post repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Run the probe. Never fails; store errors come back as `Unhealthy`.
    pub async fn check(&self) -> HealthCheckResult {
        let result = self.repository.health_check().await;
        if let Some(err) = result.error() {
            warn!(error = %err, "Database health check failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_database::MemoryRepository;

    #[tokio::test]
    async fn test_memory_store_is_healthy() {
        let check = DatabaseHealthCheck::new(MemoryRepository::<BlogPost>::new());
        let result = check.check().await;
        assert!(result.is_healthy());
        assert!(result.error().is_none());
    }
}
