//! Core traits defined in `blog-core` and implemented by other crates.

pub mod cache;
pub mod entity;
pub mod repository;

pub use cache::CacheProvider;
pub use entity::{Entity, ID_FIELD, Projectable};
pub use repository::Repository;
