//! Sitemap URL set for the public site.
//!
//! Lists the landing page, the archive, every published post and every tag
//! used by a published post. Rendering the set as XML is left to the caller.

use std::collections::HashSet;

use blog_core::config::BlogConfig;
use blog_core::result::AppResult;
use blog_core::traits::repository::Repository;
use blog_core::types::filter::FilterField;
use blog_core::types::query::Query;
use blog_entity::BlogPost;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::debug;

/// Everything except RFC 3986 unreserved characters.
const TAG_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapUrl {
    /// Absolute location.
    pub location: String,
    /// Last modification date as `YYYY-MM-DD`, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl SitemapUrl {
    fn new(location: String) -> Self {
        Self {
            location,
            last_modified: None,
        }
    }
}

/// The `<urlset>` root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SitemapUrlSet {
    /// Entries in document order.
    pub urls: Vec<SitemapUrl>,
}

/// Builds the sitemap from the blog post repository.
#[derive(Debug, Clone)]
pub struct SitemapService<R> {
    /// Blog post repository, possibly cached.
    repository: R,
    /// Base URI ending with `/`.
    base_uri: String,
}

impl<R: Repository<BlogPost>> SitemapService<R> {
    /// Create a sitemap service for the site described by `config`.
    pub fn new(repository: R, config: &BlogConfig) -> Self {
        Self {
            repository,
            base_uri: config.normalized_base_uri(),
        }
    }

    /// The base URI every location starts with.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Build the URL set: landing page, archive, posts, then tags.
    pub async fn create_sitemap(&self) -> AppResult<SitemapUrlSet> {
        let query = Query::new()
            .filter(FilterField::eq("is_published", true))
            .order_by("updated_date");
        let posts = self.repository.get_all(&query).await?.into_items();

        let mut urls = vec![
            SitemapUrl::new(self.base_uri.clone()),
            SitemapUrl::new(format!("{}archive", self.base_uri)),
        ];
        urls.extend(self.post_urls(&posts));
        urls.extend(self.tag_urls(&posts));

        debug!(posts = posts.len(), urls = urls.len(), "Built sitemap");
        Ok(SitemapUrlSet { urls })
    }

    fn post_urls<'a>(&'a self, posts: &'a [BlogPost]) -> impl Iterator<Item = SitemapUrl> + 'a {
        posts.iter().filter_map(|post| {
            let id = post.id.as_deref()?;
            Some(SitemapUrl {
                location: format!("{}blogPost/{id}", self.base_uri),
                last_modified: Some(post.updated_date.format("%Y-%m-%d").to_string()),
            })
        })
    }

    fn tag_urls(&self, posts: &[BlogPost]) -> Vec<SitemapUrl> {
        let mut seen = HashSet::new();
        posts
            .iter()
            .flat_map(|post| post.tags.iter())
            .filter(|tag| seen.insert(tag.as_str()))
            .map(|tag| {
                SitemapUrl::new(format!(
                    "{}searchByTag/{}",
                    self.base_uri,
                    utf8_percent_encode(tag, TAG_SEGMENT)
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_database::MemoryRepository;
    use blog_entity::CreateBlogPost;
    use chrono::{TimeZone, Utc};

    fn post(title: &str, day: u32, published: bool, tags: &[&str]) -> BlogPost {
        BlogPost::create(CreateBlogPost {
            title: title.to_string(),
            short_description: "desc".to_string(),
            content: "content".to_string(),
            preview_image_url: "https://img".to_string(),
            is_published: published,
            updated_date: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    async fn seeded() -> (MemoryRepository<BlogPost>, Vec<String>) {
        let repo = MemoryRepository::<BlogPost>::new();
        let mut ids = Vec::new();
        for mut p in [
            post("Older", 1, true, &["C#", "rust"]),
            post("Newer", 9, true, &["rust", "async await"]),
            post("Draft", 20, false, &["secret"]),
        ] {
            ids.push(repo.store(&mut p).await.unwrap());
        }
        (repo, ids)
    }

    #[tokio::test]
    async fn test_sitemap_lists_base_archive_posts_and_tags() {
        let (repo, ids) = seeded().await;
        let config = BlogConfig {
            base_uri: "https://blog.example".to_string(),
        };
        let service = SitemapService::new(repo, &config);

        let sitemap = service.create_sitemap().await.unwrap();
        let locations: Vec<&str> = sitemap.urls.iter().map(|u| u.location.as_str()).collect();

        assert_eq!(
            locations,
            vec![
                "https://blog.example/".to_string(),
                "https://blog.example/archive".to_string(),
                format!("https://blog.example/blogPost/{}", ids[1]),
                format!("https://blog.example/blogPost/{}", ids[0]),
                "https://blog.example/searchByTag/rust".to_string(),
                "https://blog.example/searchByTag/async%20await".to_string(),
                "https://blog.example/searchByTag/C%23".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_post_urls_carry_last_modified_date() {
        let (repo, _) = seeded().await;
        let service = SitemapService::new(repo, &BlogConfig::default());

        let sitemap = service.create_sitemap().await.unwrap();

        assert_eq!(sitemap.urls[0].last_modified, None);
        assert_eq!(sitemap.urls[2].last_modified.as_deref(), Some("2024-03-09"));
        assert_eq!(sitemap.urls[3].last_modified.as_deref(), Some("2024-03-01"));
        assert!(sitemap.urls[4].last_modified.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_yields_base_and_archive() {
        let service = SitemapService::new(MemoryRepository::<BlogPost>::new(), &BlogConfig::default());

        let sitemap = service.create_sitemap().await.unwrap();

        assert_eq!(sitemap.urls.len(), 2);
        assert_eq!(sitemap.urls[1].location, "http://localhost:5000/archive");
    }

    #[test]
    fn test_tag_encoding_keeps_unreserved() {
        let encoded = utf8_percent_encode("a-b_c.d~e/f?", TAG_SEGMENT).to_string();
        assert_eq!(encoded, "a-b_c.d~e%2Ff%3F");
    }
}
