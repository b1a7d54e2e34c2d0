//! # blog-service
//!
//! Application services layered on top of the generic repositories.
//!
//! Services take their repository at construction time and are generic
//! over [`blog_core::traits::repository::Repository`], so the same code runs
//! against any store, cached or not.

pub mod health;
pub mod sitemap;

pub use health::DatabaseHealthCheck;
pub use sitemap::{SitemapService, SitemapUrl, SitemapUrlSet};
