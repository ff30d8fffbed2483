use std::fmt;

use thiserror::Error;

const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CORS_ORIGIN: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, resolved once at process start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    pub cors_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    MySql(DatabaseConfig),
    Memory,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Read the process environment, after loading `.env` if one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` is this over `std::env`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let backend = var("STORE_BACKEND").unwrap_or_else(|| "mysql".to_string());
        let store = match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => StoreConfig::Memory,
            "mysql" => StoreConfig::MySql(DatabaseConfig {
                host: required("DB_HOST")?,
                port: parse_or("DB_PORT", var("DB_PORT"), DEFAULT_DB_PORT)?,
                name: required("DB_NAME")?,
                user: required("DB_USER")?,
                // An empty password is a valid MySQL account setting
                password: lookup("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?,
                max_connections: parse_or(
                    "DB_MAX_CONNECTIONS",
                    var("DB_MAX_CONNECTIONS"),
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            _ => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: backend,
                })
            }
        };

        Ok(Config {
            store,
            cors_origin: var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
