//! Blog post management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_core::traits::Repository;
use blog_core::types::filter::FilterField;
use blog_core::types::query::Query;
use blog_entity::BlogPost;

/// Arguments for post commands
#[derive(Debug, Args)]
pub struct PostsArgs {
    /// Post subcommand
    #[command(subcommand)]
    pub command: PostsCommand,
}

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// List posts, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Posts per page
        #[arg(long, default_value_t = 10)]
        page_size: u64,
        /// Only posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Only published (`true`) or unpublished (`false`) posts
        #[arg(long)]
        published: Option<bool>,
    },
    /// Show one post
    Show {
        /// Post ID
        id: String,
    },
    /// Delete posts by ID
    Delete {
        /// Post IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Post display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PostRow {
    /// Post ID
    id: String,
    /// Title
    title: String,
    /// Published
    published: bool,
    /// Updated at
    updated: String,
    /// Tags
    tags: String,
    /// Likes
    likes: i64,
}

impl From<&BlogPost> for PostRow {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone().unwrap_or_default(),
            title: post.title.clone(),
            published: post.is_published,
            updated: post.updated_date.format("%Y-%m-%d %H:%M").to_string(),
            tags: post.tags.join(", "),
            likes: post.likes,
        }
    }
}

/// Execute post commands
pub async fn execute(
    args: &PostsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    with_posts!(config, |posts| run(&args.command, &posts, format).await)
}

async fn run<R: Repository<BlogPost>>(
    command: &PostsCommand,
    posts: &R,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        PostsCommand::List {
            page,
            page_size,
            tag,
            published,
        } => {
            let query = list_query(*page, *page_size, tag.as_deref(), *published);
            let list = posts.get_all(&query).await?;

            let rows: Vec<PostRow> = list.iter().map(PostRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table && list.total_count() > 0 {
                println!(
                    "Page {} of {} ({} posts)",
                    list.page_number(),
                    list.total_pages(),
                    list.total_count()
                );
            }
        }
        PostsCommand::Show { id } => {
            let post = posts
                .get_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Blog post '{id}' not found")))?;
            output::print_item(&post, format);
        }
        PostsCommand::Delete { ids } => {
            if let [id] = ids.as_slice() {
                posts.delete(id).await?;
            } else {
                posts.delete_bulk(ids).await?;
            }
            output::print_success(&format!("Deleted {} post(s)", ids.len()));
        }
    }

    Ok(())
}

fn list_query(page: u64, page_size: u64, tag: Option<&str>, published: Option<bool>) -> Query {
    let mut query = Query::new().order_by("updated_date").paged(page, page_size);
    if let Some(tag) = tag {
        query = query.filter(FilterField::contains("tags", tag));
    }
    if let Some(published) = published {
        query = query.filter(FilterField::eq("is_published", published));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::types::filter::FilterOp;

    #[test]
    fn test_list_query_without_filters() {
        let query = list_query(2, 5, None, None);
        assert!(!query.has_filters());
        assert_eq!(query.page.offset(), 5);
        assert_eq!(query.order_by.unwrap().field, "updated_date");
    }

    #[test]
    fn test_list_query_with_tag_and_published() {
        let query = list_query(1, 10, Some("rust"), Some(true));
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].op, FilterOp::Contains);
        assert_eq!(query.filters[1], FilterField::eq("is_published", true));
    }
}
