//! Conversion between entities and the JSON documents stores hold.

use serde::de::DeserializeOwned;
use serde_json::Value;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::traits::{Entity, ID_FIELD};

/// Generate a new random entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serialize an entity into a JSON object.
pub fn to_document<E: Entity>(entity: &E) -> AppResult<Value> {
    let document = serde_json::to_value(entity)?;
    if !document.is_object() {
        return Err(AppError::validation(format!(
            "Entities of '{}' must serialize to a JSON object",
            E::COLLECTION
        )));
    }
    Ok(document)
}

/// Deserialize a stored document into an entity or projection.
pub fn from_document<P: DeserializeOwned>(document: Value) -> AppResult<P> {
    Ok(serde_json::from_value(document)?)
}

/// Assign an id to a transient entity and return its document.
pub fn prepare<E: Entity>(
    entity: &mut E,
    generate: impl FnOnce() -> String,
) -> AppResult<(String, Value)> {
    let id = entity.ensure_id(generate);
    let mut document = to_document(entity)?;
    if let Some(object) = document.as_object_mut() {
        object.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    }
    Ok((id, document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_entity::ProfileInformationEntry;

    #[test]
    fn test_prepare_assigns_id_once() {
        let mut entry = ProfileInformationEntry::create("Hello", 1).unwrap();
        let (id, document) = prepare(&mut entry, || "generated".to_string()).unwrap();
        assert_eq!(id, "generated");
        assert_eq!(document["id"], "generated");

        let (again, _) = prepare(&mut entry, || "other".to_string()).unwrap();
        assert_eq!(again, "generated");
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
