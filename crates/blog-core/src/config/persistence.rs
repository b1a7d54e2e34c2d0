//! Store selection configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The storage technology backing every repository in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// Relational storage in PostgreSQL.
    Postgres,
    /// Document storage in MongoDB.
    #[serde(rename = "mongodb")]
    MongoDb,
    /// Document storage in Redis hashes.
    Redis,
    /// Process-local storage, lost on exit.
    #[default]
    Memory,
}

impl StorageProvider {
    /// Return the configuration name of this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MongoDb => "mongodb",
            Self::Redis => "redis",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "sql" => Ok(Self::Postgres),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            _ => Err(AppError::configuration(format!(
                "Unknown storage provider: '{s}'. Supported: postgres, mongodb, redis, memory"
            ))),
        }
    }
}

/// Repository layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Which store to open at startup.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Number of records per batch for bulk store/delete in the relational store.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Whether blog post reads go through the caching decorator.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            batch_size: default_batch_size(),
            cache_enabled: true,
        }
    }
}

fn default_batch_size() -> usize {
    1000
}

fn default_true() -> bool {
    true
}
