//! Sitemap CLI command.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_service::{SitemapService, SitemapUrl};

/// Sitemap display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UrlRow {
    /// Location
    location: String,
    /// Last modified
    last_modified: String,
}

impl From<SitemapUrl> for UrlRow {
    fn from(url: SitemapUrl) -> Self {
        Self {
            location: url.location,
            last_modified: url.last_modified.unwrap_or_default(),
        }
    }
}

/// Print the sitemap URL set of the configured site.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let sitemap = with_posts!(config, |posts| {
        SitemapService::new(posts, &config.blog).create_sitemap().await?
    });

    match format {
        OutputFormat::Json => output::print_item(&sitemap, format),
        OutputFormat::Table => {
            let rows: Vec<UrlRow> = sitemap.urls.into_iter().map(UrlRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
