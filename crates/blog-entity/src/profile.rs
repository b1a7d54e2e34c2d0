//! Profile information entry.

use serde::{Deserialize, Serialize};

use blog_core::error::AppError;
use blog_core::result::AppResult;

/// One line of the author's profile, ordered by `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInformationEntry {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Markdown content.
    pub content: String,
    /// Position in the profile list.
    pub sort_order: i32,
}

impl ProfileInformationEntry {
    /// Create a new entry.
    pub fn create(content: &str, sort_order: i32) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Err(AppError::validation("Profile entry content must not be empty"));
        }
        Ok(Self {
            id: None,
            content: content.trim().to_string(),
            sort_order,
        })
    }
}

impl_entity!(ProfileInformationEntry, "profile_information_entries");
