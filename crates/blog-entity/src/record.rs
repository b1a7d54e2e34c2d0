//! Daily click record for a blog post.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of clicks a post received on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostRecord {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// The post the clicks belong to.
    pub blog_post_id: String,
    /// The day the clicks were counted.
    pub date_clicked: NaiveDate,
    /// Click count.
    pub clicks: i64,
}

impl BlogPostRecord {
    /// Create a record for a post and day.
    pub fn new(blog_post_id: impl Into<String>, date_clicked: NaiveDate, clicks: i64) -> Self {
        Self {
            id: None,
            blog_post_id: blog_post_id.into(),
            date_clicked,
            clicks,
        }
    }
}

impl_entity!(BlogPostRecord, "blog_post_records");
