//! The identity contract shared by every stored record.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Name of the identity field in every stored document.
pub const ID_FIELD: &str = "id";

/// A domain record with a store-assigned string identity.
///
/// The id is `None` until the record is first stored. Once assigned it
/// never changes; stores only call [`Entity::set_id`] on records that
/// have no id yet.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table or collection holding records of this type.
    const COLLECTION: &'static str;

    /// The record's id, if it has been stored.
    fn id(&self) -> Option<&str>;

    /// Assign the store-generated id.
    fn set_id(&mut self, id: String);

    /// Whether the record still needs an id. Blank ids count as missing.
    fn is_transient(&self) -> bool {
        self.id().is_none_or(|id| id.trim().is_empty())
    }

    /// Return the record's id, generating and assigning one first if missing.
    fn ensure_id(&mut self, generate: impl FnOnce() -> String) -> String
    where
        Self: Sized,
    {
        if self.is_transient() {
            self.set_id(generate());
        }
        self.id().map(str::to_string).unwrap_or_default()
    }
}

/// A shape that list queries can return: the entity itself or a projection of it.
pub trait Projectable: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Projectable for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}
