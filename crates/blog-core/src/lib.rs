//! # blog-core
//!
//! Core crate for the blog engine. Contains the entity and repository
//! contracts, configuration schemas, query/paging/projection types,
//! health-check results, and the unified error system.
//!
//! This crate has **no** internal dependencies on other blog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
