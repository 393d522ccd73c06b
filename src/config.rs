//! Configuration management for the userstats server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database connection settings.
///
/// The connection is described field by field (`engine`, `host`, `port`,
/// `username`, `pass`, `dbname`); `url` wins over them when set.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub engine: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub pass: String,
    pub dbname: String,
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on a single store call
    pub query_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also append logs to this file when set
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time given to in-flight requests once a shutdown signal arrives
    pub drain_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. USERSTATS__SERVER__PORT)
            .add_source(
                Environment::with_prefix("USERSTATS")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override database URL from DATABASE_URL env var if present
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Build connection options from the configured descriptor
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::Message(format!("Invalid database url: {}", e)));
        }

        match self.engine.as_str() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(ConfigError::Message(format!(
                    "Unsupported database engine: {}",
                    other
                )))
            }
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.pass)
            .database(&self.dbname))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl LoggingConfig {
    /// Log file path, treating an empty value as no file
    pub fn file_path(&self) -> Option<&str> {
        self.file.as_deref().filter(|file| !file.trim().is_empty())
    }
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1234,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            username: "userstats".to_string(),
            pass: "userstats".to_string(),
            dbname: "userstats".to_string(),
            url: None,
            max_connections: 10,
            min_connections: 1,
            query_timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 10,
        }
    }
}
