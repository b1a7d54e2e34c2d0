//! MongoDB store.

pub mod connection;
pub mod filter;
pub mod repository;

pub use connection::MongoStore;
pub use repository::MongoRepository;
