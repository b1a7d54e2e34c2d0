//! Redis hash document store.

pub mod connection;
pub mod repository;

pub use connection::RedisDocumentStore;
pub use repository::RedisRepository;
