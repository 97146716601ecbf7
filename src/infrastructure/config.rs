use chrono::Duration;
use std::env;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://automax.db";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub seed_catalog: bool,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let ttl_raw = lookup("SESSION_TTL_HOURS");
        let ttl_hours = parse_or("SESSION_TTL_HOURS", ttl_raw.clone(), DEFAULT_SESSION_TTL_HOURS)?;
        if ttl_hours < 1 {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_HOURS",
                value: ttl_raw.unwrap_or_default(),
            });
        }

        let cookie_secure = parse_flag("COOKIE_SECURE", lookup("COOKIE_SECURE"), false)?;
        let seed_catalog = parse_flag("SEED_CATALOG", lookup("SEED_CATALOG"), true)?;

        Ok(Self {
            host,
            port,
            database_url,
            session_ttl: Duration::hours(ttl_hours),
            cookie_secure,
            seed_catalog,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
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
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn parse_flag(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
    }
}
