//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use blog_core::config::{AppConfig, StorageProvider};
use blog_core::error::AppError;
use blog_database::provider::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration with passwords masked
    Show,
    /// Validate the configuration and summarize the selected back ends
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(&masked(config), format);
        }
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Store", config.persistence.provider.as_str());
            if let Some(url) = store_url(config) {
                output::print_kv("Store URL", &mask_password(url));
            }
            output::print_kv("Batch size", &config.persistence.batch_size.to_string());
            let cache = if config.persistence.cache_enabled {
                config.cache.provider.as_str()
            } else {
                "disabled"
            };
            output::print_kv("Cache", cache);
            output::print_kv("Base URI", &config.blog.normalized_base_uri());
        }
    }

    Ok(())
}

fn store_url(config: &AppConfig) -> Option<&str> {
    match config.persistence.provider {
        StorageProvider::Postgres => Some(&config.database.url),
        StorageProvider::MongoDb => Some(&config.mongodb.url),
        StorageProvider::Redis => Some(&config.redis.url),
        StorageProvider::Memory => None,
    }
}

fn masked(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.database.url = mask_password(&config.database.url);
    config.mongodb.url = mask_password(&config.mongodb.url);
    config.redis.url = mask_password(&config.redis.url);
    config.cache.redis.url = mask_password(&config.cache.redis.url);
    config
}
