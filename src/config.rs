//! Connection settings read from the environment.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Database settings for the bot.
///
/// | Variable                              | Default |
/// |---------------------------------------|---------|
/// | `DATABASE_URL`                        | required |
/// | `OFFICE_HOURS_MAX_CONNECTIONS`        | 10      |
/// | `OFFICE_HOURS_MIN_CONNECTIONS`        | 1       |
/// | `OFFICE_HOURS_CONNECT_TIMEOUT_SECS`   | 10      |
/// | `OFFICE_HOURS_IDLE_TIMEOUT_SECS`      | 600     |
/// | `OFFICE_HOURS_SQL_LOGGING`            | false   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub sqlx_logging: bool,
}

impl Config {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = parse_or(&lookup, "OFFICE_HOURS_MAX_CONNECTIONS", 10)?;
        let min_connections = parse_or(&lookup, "OFFICE_HOURS_MIN_CONNECTIONS", 1)?;
        if min_connections > max_connections {
            return Err(ConfigError::Invalid {
                key: "OFFICE_HOURS_MIN_CONNECTIONS",
                value: min_connections.to_string(),
            });
        }

        Ok(Self {
            database_url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "OFFICE_HOURS_CONNECT_TIMEOUT_SECS",
                10,
            )?),
            idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "OFFICE_HOURS_IDLE_TIMEOUT_SECS",
                600,
            )?),
            sqlx_logging: parse_or(&lookup, "OFFICE_HOURS_SQL_LOGGING", false)?,
        })
    }

    /// Sea-ORM connection options for these settings.
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.sqlx_logging);
        opt
    }

    /// Opens the database connection pool.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        tracing::info!(
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            "connecting to database"
        );
        Database::connect(self.connect_options()).await
    }
}

fn parse_or<V: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: V,
) -> Result<V, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
