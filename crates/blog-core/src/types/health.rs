//! Health check results reported by stores.

use serde::Serialize;

use crate::error::AppError;

/// Outcome of a store round-trip probe.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthCheckResult {
    /// The store answered the probe.
    Healthy {
        /// Optional detail, e.g. the probe that was run.
        description: Option<String>,
    },
    /// The probe failed.
    Unhealthy {
        /// What failed.
        description: String,
        /// The error raised by the probe.
        #[serde(skip)]
        error: Option<AppError>,
    },
}

impl HealthCheckResult {
    /// A healthy result without detail.
    pub fn healthy() -> Self {
        Self::Healthy { description: None }
    }

    /// A healthy result with a description.
    pub fn healthy_with(description: impl Into<String>) -> Self {
        Self::Healthy {
            description: Some(description.into()),
        }
    }

    /// An unhealthy result carrying the probe's error.
    pub fn unhealthy(error: AppError) -> Self {
        Self::Unhealthy {
            description: error.to_string(),
            error: Some(error),
        }
    }

    /// Whether the store is healthy.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    /// The error that made the probe fail, if any.
    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Healthy { .. } => None,
            Self::Unhealthy { error, .. } => error.as_ref(),
        }
    }
}

impl From<crate::result::AppResult<()>> for HealthCheckResult {
    fn from(result: crate::result::AppResult<()>) -> Self {
        match result {
            Ok(()) => Self::healthy(),
            Err(e) => Self::unhealthy(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_keeps_error() {
        let result: HealthCheckResult = Err(AppError::database("connection refused")).into();
        assert!(!result.is_healthy());
        assert_eq!(result.error().unwrap().message, "connection refused");
    }

    #[test]
    fn test_serializes_status_tag() {
        let json = serde_json::to_value(HealthCheckResult::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
    }
}
