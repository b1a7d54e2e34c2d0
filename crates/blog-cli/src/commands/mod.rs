//! CLI command definitions and dispatch.

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use blog_core::config::AppConfig;
use blog_core::error::AppError;

/// Bind `$repo` to the blog post repository of the configured store and
/// evaluate `$body`, wrapping the repository in the read cache when enabled.
macro_rules! with_posts {
    ($config:expr, |$repo:ident| $body:expr) => {{
        let connection = blog_database::StorageConnection::connect($config).await?;
        let $repo = connection.repository::<blog_entity::BlogPost>();
        if $config.persistence.cache_enabled {
            let cache = blog_cache::CacheManager::new(&$config.cache).await?;
            let $repo: blog_cache::CachedRepository<_, blog_entity::BlogPost> =
                blog_cache::cached($repo, cache);
            $body
        } else {
            $body
        }
    }};
}

pub mod config;
pub mod health;
pub mod posts;
pub mod seed;
pub mod sitemap;

/// Blog store administration
#[derive(Debug, Parser)]
#[command(name = "blog", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Round-trip probe against the configured store
    Health,
    /// Blog post management
    Posts(posts::PostsArgs),
    /// Insert sample blog posts
    Seed(seed::SeedArgs),
    /// Print the sitemap URL set
    Sitemap,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &self.config, config, self.format),
            Commands::Health => health::execute(config, self.format).await,
            Commands::Posts(args) => posts::execute(args, config, self.format).await,
            Commands::Seed(args) => seed::execute(args, config).await,
            Commands::Sitemap => sitemap::execute(config, self.format).await,
        }
    }
}
