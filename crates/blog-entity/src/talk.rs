//! Talk entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_core::error::AppError;
use blog_core::result::AppResult;

/// A conference talk given by the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Presentation title.
    pub presentation_title: String,
    /// Where the talk took place.
    pub place: String,
    /// Abstract.
    pub description: String,
    /// When the talk was given.
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub published_date: DateTime<Utc>,
}

impl Talk {
    /// Create a new talk.
    pub fn create(
        presentation_title: &str,
        place: &str,
        description: &str,
        published_date: DateTime<Utc>,
    ) -> AppResult<Self> {
        if presentation_title.trim().is_empty() {
            return Err(AppError::validation("Talk title must not be empty"));
        }
        if place.trim().is_empty() {
            return Err(AppError::validation("Talk place must not be empty"));
        }

        Ok(Self {
            id: None,
            presentation_title: presentation_title.trim().to_string(),
            place: place.trim().to_string(),
            description: description.trim().to_string(),
            published_date,
        })
    }
}

impl_entity!(Talk, "talks");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_place() {
        assert!(Talk::create("Title", " ", "", Utc::now()).is_err());
        assert!(Talk::create("Title", "Zurich", "", Utc::now()).is_ok());
    }
}
