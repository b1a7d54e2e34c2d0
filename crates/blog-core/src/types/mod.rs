//! Core type definitions used across the blog workspace.

pub mod filter;
pub mod health;
pub mod pagination;
pub mod projection;
pub mod query;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use health::HealthCheckResult;
pub use pagination::{PageRequest, PagedList};
pub use projection::Projection;
pub use query::Query;
pub use sorting::{SortDirection, SortField};
