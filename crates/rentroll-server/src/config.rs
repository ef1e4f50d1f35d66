//! Server configuration, read from `RENTROLL_*` environment variables.

use std::env;
use std::str::FromStr;

use rentroll_auth::AuthConfig;
use rentroll_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Reject mutating forms whose `csrf_token` does not match the session.
    pub csrf_enabled: bool,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            csrf_enabled: true,
            db: DbConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}

fn flag(name: &'static str) -> Result<Option<bool>, ConfigError> {
    var(name)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        })
        .transpose()
}

impl ServerConfig {
    /// Defaults overridden by whichever variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = var("RENTROLL_DATABASE_URL") {
            config.db.url = url;
        }
        if let Some(namespace) = var("RENTROLL_DB_NAMESPACE") {
            config.db.namespace = namespace;
        }
        if let Some(database) = var("RENTROLL_DB_DATABASE") {
            config.db.database = database;
        }
        config.db.username = var("RENTROLL_DB_USERNAME");
        config.db.password = var("RENTROLL_DB_PASSWORD");

        if let Some(port) = parsed("RENTROLL_PORT")? {
            config.port = port;
        }
        if let Some(enabled) = flag("RENTROLL_CSRF_ENABLED")? {
            config.csrf_enabled = enabled;
        }
        if let Some(secs) = parsed("RENTROLL_SESSION_LIFETIME_SECS")? {
            config.auth.session_lifetime_secs = secs;
        }
        config.auth.pepper = var("RENTROLL_PASSWORD_PEPPER");

        Ok(config)
    }
}
