//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::db::ConnectionOptions;
use crate::pagination::PaginationStrategy;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the command line tool and of the services it drives.
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "enabled")]
    pub enable_wal: bool,
    #[serde(default = "enabled")]
    pub enable_foreign_keys: bool,
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
    #[serde(default)]
    pub log_queries: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Defaults applied to page requests that leave parts unspecified.
pub struct PaginationConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub strategy: PaginationStrategy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            strategy: PaginationStrategy::default(),
        }
    }
}

fn enabled() -> bool {
    true
}

fn default_busy_timeout_secs() -> u64 {
    30
}

impl From<&DatabaseConfig> for ConnectionOptions {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            enable_wal: config.enable_wal,
            enable_foreign_keys: config.enable_foreign_keys,
            busy_timeout: (config.busy_timeout_secs > 0)
                .then(|| Duration::from_secs(config.busy_timeout_secs)),
            log_queries: config.log_queries,
            observer: None,
        }
    }
}

#[cfg(feature = "cli")]
impl AppConfig {
    /// Loads `config/default.yaml` (or the file named by `APP_CONFIG`)
    /// overlaid with `APP_*` environment variables, e.g.
    /// `APP_DATABASE__URL`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/default".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
