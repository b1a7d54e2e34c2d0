//! # blog-entity
//!
//! Domain entity models for the blog engine. Every struct in this crate
//! is a stored record: it derives `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and implements [`blog_core::traits::Entity`] with the
//! name of the collection (or table) that holds it.

/// Implement [`blog_core::traits::Entity`] for a struct with an `id: Option<String>` field.
macro_rules! impl_entity {
    ($name:ident, $collection:literal) => {
        impl blog_core::traits::Entity for $name {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
}

pub mod blog_post;
pub mod profile;
pub mod record;
pub mod skill;
pub mod talk;
pub mod timestamp;

pub use blog_post::{BlogPost, CreateBlogPost};
pub use profile::ProfileInformationEntry;
pub use record::BlogPostRecord;
pub use skill::{ProficiencyLevel, Skill};
pub use talk::Talk;
