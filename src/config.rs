use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::engine::DEFAULT_TOPIC_NAME;
use crate::lookup::DEFAULT_LOOKUP_SERVICE_NAME;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub overlay: OverlayConfig,
    pub lookup: LookupConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Names the overlay framework routes by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub topic_name: String,
    pub lookup_service_name: String,
}

/// Paging bounds applied to lookup queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when RUST_LOG is unset
    pub filter: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 1000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from("./btms_index.db"),
            },
            overlay: OverlayConfig {
                topic_name: DEFAULT_TOPIC_NAME.to_string(),
                lookup_service_name: DEFAULT_LOOKUP_SERVICE_NAME.to_string(),
            },
            lookup: LookupConfig::default(),
            logging: LoggingConfig {
                filter: "info".to_string(),
            },
        }
    }
}

impl LookupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(ConfigError::Message(
                "lookup.default_limit and lookup.max_limit must be greater than zero".to_string(),
            ));
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::Message(format!(
                "lookup.default_limit ({}) exceeds lookup.max_limit ({})",
                self.default_limit, self.max_limit
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Config::builder()
            // Start with default values
            .set_default("database.path", defaults.database.path.to_string_lossy().to_string())?
            .set_default("overlay.topic_name", defaults.overlay.topic_name)?
            .set_default(
                "overlay.lookup_service_name",
                defaults.overlay.lookup_service_name,
            )?
            .set_default("lookup.default_limit", defaults.lookup.default_limit as i64)?
            .set_default("lookup.max_limit", defaults.lookup.max_limit as i64)?
            .set_default("logging.filter", defaults.logging.filter)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // BTMS_LOOKUP__MAX_LIMIT style variables override nested keys
            .add_source(
                config::Environment::with_prefix("BTMS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Check for specific environment variables with custom names
        if let Ok(db_path) = env::var("BTMS_DATABASE_PATH") {
            app_config.database.path = PathBuf::from(db_path);
        }

        app_config.lookup.validate()?;
        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Self {
        // Fall back to built-in defaults if the config is unreadable or invalid
        Self::load().unwrap_or_default()
    }
}
