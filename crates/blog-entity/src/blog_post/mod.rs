//! Blog post domain entity.

pub mod model;

pub use model::{BlogPost, CreateBlogPost};
