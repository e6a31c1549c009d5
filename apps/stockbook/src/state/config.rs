//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKBOOK_DATABASE_PATH`, `STOCKBOOK_PAGE_SIZE`, ...)
//! 2. Config file (`stockbook.toml` in the working directory, or `--config`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock needed.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use stockbook_core::DEFAULT_PAGE_SIZE;

const DEFAULT_CONFIG_FILE: &str = "stockbook";
const DEFAULT_DATABASE_PATH: &str = "./stockbook.db";
const DEFAULT_LOG_FILTER: &str = "info,stockbook=debug,sqlx=warn";
const ENV_PREFIX: &str = "STOCKBOOK";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigState {
    /// SQLite database file.
    pub database_path: String,

    /// Rows per page on paginated lists.
    pub page_size: usize,

    /// Connection pool size.
    pub max_connections: u32,

    /// Default tracing filter, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_connections: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ConfigState {
    /// Loads configuration from defaults, a TOML file and the environment.
    ///
    /// With `file = None` an optional `stockbook.toml` is picked up from the
    /// working directory. An explicit path must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Self::from_builder(
            Self::defaults()?
                .add_source(file_source)
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let d = ConfigState::default();

        Config::builder()
            .set_default("database_path", d.database_path)?
            .set_default("page_size", d.page_size as i64)?
            .set_default("max_connections", i64::from(d.max_connections))?
            .set_default("log_filter", d.log_filter)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: ConfigState = builder.build()?.try_deserialize()?;

        if config.page_size == 0 {
            config.page_size = DEFAULT_PAGE_SIZE;
        }
        if config.max_connections == 0 {
            return Err(ConfigError::Message(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
