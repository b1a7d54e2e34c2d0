//! Blog post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_core::error::AppError;
use blog_core::result::AppResult;

/// Average reading speed used to estimate reading time.
const WORDS_PER_MINUTE: usize = 250;

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Post title.
    pub title: String,
    /// Teaser shown in listings.
    pub short_description: String,
    /// Markdown body.
    pub content: String,
    /// Preview image URL.
    pub preview_image_url: String,
    /// Fallback preview image URL for clients without the primary format.
    #[serde(default)]
    pub preview_image_url_fallback: Option<String>,
    /// When the post was last changed.
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub updated_date: DateTime<Utc>,
    /// When an unpublished post goes live, if scheduled.
    #[serde(default, serialize_with = "crate::timestamp::serialize_option")]
    pub scheduled_publish_date: Option<DateTime<Utc>>,
    /// Tags, trimmed and without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of likes.
    #[serde(default)]
    pub likes: i64,
    /// Whether the post is publicly visible.
    pub is_published: bool,
    /// Estimated reading time.
    #[serde(default)]
    pub reading_time_in_minutes: i64,
}

/// Data required to create a new blog post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogPost {
    /// Post title.
    pub title: String,
    /// Teaser shown in listings.
    pub short_description: String,
    /// Markdown body.
    pub content: String,
    /// Preview image URL.
    pub preview_image_url: String,
    /// Fallback preview image URL.
    pub preview_image_url_fallback: Option<String>,
    /// Publish immediately.
    pub is_published: bool,
    /// Explicit last-changed date; defaults to now.
    pub updated_date: Option<DateTime<Utc>>,
    /// Future publish date for unpublished posts.
    pub scheduled_publish_date: Option<DateTime<Utc>>,
    /// Tags.
    pub tags: Vec<String>,
}

impl BlogPost {
    /// Create a new, not yet stored blog post.
    pub fn create(data: CreateBlogPost) -> AppResult<Self> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Blog post title must not be empty"));
        }
        if data.scheduled_publish_date.is_some() && data.is_published {
            return Err(AppError::validation(
                "Can't schedule a publish date for a post that is already published",
            ));
        }
        if data
            .scheduled_publish_date
            .is_some_and(|date| date <= Utc::now())
        {
            return Err(AppError::validation(
                "The scheduled publish date must be in the future",
            ));
        }

        Ok(Self {
            id: None,
            reading_time_in_minutes: reading_time(&data.content),
            title: data.title,
            short_description: data.short_description,
            content: data.content,
            preview_image_url: data.preview_image_url,
            preview_image_url_fallback: data.preview_image_url_fallback,
            updated_date: data.updated_date.unwrap_or_else(Utc::now),
            scheduled_publish_date: data.scheduled_publish_date,
            tags: normalize_tags(data.tags),
            likes: 0,
            is_published: data.is_published,
        })
    }

    /// Replace every content field with those of `other`, keeping id and likes.
    pub fn update(&mut self, other: &BlogPost) {
        self.title = other.title.clone();
        self.short_description = other.short_description.clone();
        self.content = other.content.clone();
        self.preview_image_url = other.preview_image_url.clone();
        self.preview_image_url_fallback = other.preview_image_url_fallback.clone();
        self.updated_date = other.updated_date;
        self.scheduled_publish_date = other.scheduled_publish_date;
        self.is_published = other.is_published;
        self.tags = normalize_tags(other.tags.clone());
        self.reading_time_in_minutes = reading_time(&self.content);
    }

    /// Publish the post now, clearing any schedule.
    pub fn publish(&mut self) {
        self.scheduled_publish_date = None;
        self.is_published = true;
    }

    /// Whether the post waits for a scheduled publish date.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_publish_date.is_some()
    }

    /// Whether the post is scheduled and its date has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_published && self.scheduled_publish_date.is_some_and(|date| date <= now)
    }
}

impl_entity!(BlogPost, "blog_posts");

fn reading_time(content: &str) -> i64 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i64
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::traits::Entity;

    fn draft(title: &str) -> CreateBlogPost {
        CreateBlogPost {
            title: title.to_string(),
            short_description: "short".to_string(),
            content: "word ".repeat(600),
            preview_image_url: "https://img/preview.png".to_string(),
            tags: vec![" rust ".to_string(), "rust".to_string(), "".to_string(), "db".to_string()],
            ..CreateBlogPost::default()
        }
    }

    #[test]
    fn test_create_normalizes_tags_and_reading_time() {
        let post = BlogPost::create(draft("Hello")).unwrap();
        assert_eq!(post.tags, vec!["rust", "db"]);
        assert_eq!(post.reading_time_in_minutes, 3);
        assert!(post.is_transient());
        assert_eq!(BlogPost::COLLECTION, "blog_posts");
    }

    #[test]
    fn test_create_rejects_blank_title() {
        assert!(BlogPost::create(draft("  ")).is_err());
    }

    #[test]
    fn test_cannot_schedule_published_post() {
        let mut data = draft("Scheduled");
        data.is_published = true;
        data.scheduled_publish_date = Some(Utc::now() + chrono::Duration::days(1));
        assert!(BlogPost::create(data).is_err());
    }

    #[test]
    fn test_create_rejects_past_schedule() {
        let mut data = draft("Yesterday");
        data.scheduled_publish_date = Some(Utc::now() - chrono::Duration::days(30));
        let err = BlogPost::create(data).unwrap_err();
        assert!(err.is(blog_core::error::ErrorKind::Validation));
    }

    #[test]
    fn test_stored_dates_are_fixed_width() {
        let mut data = draft("Precise");
        data.updated_date = Some(
            chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 5, 1, 12, 0, 0).unwrap()
                + chrono::Duration::milliseconds(123),
        );
        let post = BlogPost::create(data).unwrap();
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["updated_date"], "2024-05-01T12:00:00.123000000Z");
        assert!(json["scheduled_publish_date"].is_null());
        let back: BlogPost = serde_json::from_value(json).unwrap();
        assert_eq!(back.updated_date, post.updated_date);
    }

    #[test]
    fn test_update_replaces_content_but_keeps_identity() {
        let mut post = BlogPost::create(draft("Old")).unwrap();
        post.set_id("abc".to_string());
        post.likes = 4;
        let replacement = BlogPost::create(CreateBlogPost {
            title: "New".to_string(),
            content: "short".to_string(),
            ..draft("New")
        })
        .unwrap();

        post.update(&replacement);
        assert_eq!(post.id(), Some("abc"));
        assert_eq!(post.title, "New");
        assert_eq!(post.likes, 4);
        assert_eq!(post.reading_time_in_minutes, 1);
    }

    #[test]
    fn test_publish_clears_schedule() {
        let go_live = Utc::now() + chrono::Duration::days(1);
        let mut data = draft("Later");
        data.scheduled_publish_date = Some(go_live);
        let mut post = BlogPost::create(data).unwrap();
        assert!(!post.is_due(Utc::now()));
        assert!(post.is_due(go_live + chrono::Duration::seconds(1)));
        post.publish();
        assert!(post.is_published);
        assert!(!post.is_scheduled());
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = serde_json::json!({
            "title": "t",
            "short_description": "s",
            "content": "c",
            "preview_image_url": "p",
            "updated_date": "2024-01-01T00:00:00Z",
            "is_published": true
        });
        let post: BlogPost = serde_json::from_value(json).unwrap();
        assert!(post.id.is_none());
        assert!(post.tags.is_empty());
    }
}
