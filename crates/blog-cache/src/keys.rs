//! Cache key builders for repository cache entries.
//!
//! Every key is scoped by collection, process epoch and collection
//! generation, so bumping a generation orphans all older entries at once:
//!
//! ```text
//! blog:{collection}:{epoch}:{generation}:id:{id}
//! blog:{collection}:{epoch}:{generation}:list:{fingerprint}
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};

use blog_core::result::AppResult;
use blog_core::types::{Projection, Query};

/// Prefix applied to all repository cache keys.
const PREFIX: &str = "blog";

/// Cache key for one entity by id.
pub fn entity_by_id(collection: &str, epoch: &str, generation: u64, id: &str) -> String {
    format!("{PREFIX}:{collection}:{epoch}:{generation}:id:{id}")
}

/// Cache key for one page of a list query.
pub fn entity_list(collection: &str, epoch: &str, generation: u64, fingerprint: &str) -> String {
    format!("{PREFIX}:{collection}:{epoch}:{generation}:list:{fingerprint}")
}

/// Pattern matching every entry of one generation.
pub fn generation_pattern(collection: &str, epoch: &str, generation: u64) -> String {
    format!("{PREFIX}:{collection}:{epoch}:{generation}:*")
}

#[derive(Serialize)]
struct ListShape<'a> {
    query: &'a Query,
    projection: &'a Projection,
    target: &'a str,
}

/// Stable fingerprint of a list query.
///
/// Covers every filter, the order key and direction, page, page size,
/// the projection fields and the projection target type.
pub fn list_fingerprint(query: &Query, projection: &Projection, target: &str) -> AppResult<String> {
    let shape = serde_json::to_vec(&ListShape {
        query,
        projection,
        target,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&shape);
    Ok(hex::encode(hasher.finalize()))
}
