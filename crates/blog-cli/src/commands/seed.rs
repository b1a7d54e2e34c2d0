//! Sample data CLI command.

use chrono::{Duration, Utc};
use clap::Args;
use tracing::info;

use crate::output;
use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_core::traits::Repository;
use blog_entity::{BlogPost, CreateBlogPost};

const SAMPLE_TAGS: [&str; 5] = ["rust", "async", "databases", "caching", "tooling"];

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Number of posts to insert
    #[arg(default_value_t = 10)]
    pub count: usize,
}

/// Insert `count` sample posts in one bulk store.
pub async fn execute(args: &SeedArgs, config: &AppConfig) -> Result<(), AppError> {
    if args.count == 0 {
        output::print_warning("Nothing to seed");
        return Ok(());
    }

    let mut posts = sample_posts(args.count)?;
    with_posts!(config, |repo| repo.store_bulk(&mut posts).await?);

    info!(count = posts.len(), "Seeded blog posts");
    output::print_success(&format!("Inserted {} blog post(s)", posts.len()));
    Ok(())
}

fn sample_posts(count: usize) -> Result<Vec<BlogPost>, AppError> {
    let now = Utc::now();
    (0..count)
        .map(|n| {
            let first = SAMPLE_TAGS[n % SAMPLE_TAGS.len()];
            let second = SAMPLE_TAGS[(n + 2) % SAMPLE_TAGS.len()];
            BlogPost::create(CreateBlogPost {
                title: format!("Sample post {}", n + 1),
                short_description: format!("Notes on {first} and {second}"),
                content: format!("# Sample post {}\n\nSome words about {first}.", n + 1),
                preview_image_url: format!("https://picsum.photos/seed/{n}/800/400"),
                is_published: n % 4 != 3,
                updated_date: Some(now - Duration::days(n as i64)),
                tags: vec![first.to_string(), second.to_string()],
                ..Default::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_posts_are_valid_and_transient() {
        let posts = sample_posts(8).unwrap();
        assert_eq!(posts.len(), 8);
        assert!(posts.iter().all(|p| p.id.is_none()));
        assert_eq!(posts.iter().filter(|p| !p.is_published).count(), 2);
        assert!(posts[0].updated_date > posts[7].updated_date);
        assert_eq!(posts[0].tags, vec!["rust", "databases"]);
    }
}
