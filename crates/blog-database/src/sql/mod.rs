//! PostgreSQL store.

pub mod connection;
pub mod migration;
pub mod query;
pub mod repository;

pub use connection::DatabasePool;
pub use migration::{ensure_collection, run_migrations};
pub use repository::SqlRepository;
