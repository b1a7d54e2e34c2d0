//! # blog-cache
//!
//! Read caching for blog repositories. Supports two providers:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration and wrapped
//! around any repository with [`cached`].

pub mod generation;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod repository;

pub use generation::CacheGenerations;
pub use provider::CacheManager;
pub use repository::{CachedRepository, cached};
