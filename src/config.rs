use std::env;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://club_booking.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_dir: String,
    /// Pool size override; when unset the backend picks its own default.
    pub max_connections: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: parse_var("PORT")?.unwrap_or(DEFAULT_PORT),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string()),
            max_connections: parse_var("DB_MAX_CONNECTIONS")?,
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}
