//! # blog-database
//!
//! Store connections and [`Repository`](blog_core::traits::Repository)
//! implementations for the blog engine:
//!
//! - **postgres**: one JSONB document table per collection, queries compiled to SQL
//! - **mongo**: one collection per entity type, queries compiled to BSON
//! - **redis**: one hash per collection, queries evaluated in process
//! - **memory**: process-local maps, queries evaluated in process
//!
//! The back end is chosen once at startup through [`StorageConnection`].

pub mod document;
pub mod evaluate;
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
#[cfg(feature = "postgres")]
pub mod sql;

pub use memory::{MemoryRepository, MemoryStore};
pub use provider::{AnyRepository, StorageConnection};
#[cfg(feature = "postgres")]
pub use sql::{DatabasePool, SqlRepository};
