//! Configuration management for the Replenishment Dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RPD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{DEFAULT_LEAD_TIME_DAYS, DEFAULT_TARGET_MONTHS};

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Which dataset store backs the API
    pub storage: StorageConfig,

    /// Database configuration, used by the postgres store
    pub database: DatabaseConfig,

    /// Analysis defaults
    pub planning: PlanningConfig,

    /// Upload limits
    pub upload: UploadConfig,

    /// Log output format
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, required when storage.backend = postgres
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Run embedded migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    /// Coverage target used when a request does not pass `target_months`
    pub default_target_months: u32,

    /// Lead time used when a request does not pass `lead_time_days`
    pub lead_time_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted request body in bytes
    pub max_bytes: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human readable format
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RPD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", true)?
            .set_default("planning.default_target_months", DEFAULT_TARGET_MONTHS)?
            .set_default("planning.lead_time_days", DEFAULT_LEAD_TIME_DAYS)?
            .set_default("upload.max_bytes", 20 * 1024 * 1024)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RPD_ prefix)
            .add_source(
                Environment::with_prefix("RPD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 2,
            run_migrations: true,
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_target_months: DEFAULT_TARGET_MONTHS,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 20 * 1024 * 1024,
        }
    }
}
