use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_SECRET_KEY: &str = "default_secret_key_please_change";

/// Process-wide settings, read once at startup and handed to the components that
/// need them.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub pool: PoolConfig,
    pub auth: AuthConfig,
}

/// Connection pool sizing: `size` connections are kept open, up to `max_overflow`
/// more are opened under load.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub size: u32,
    pub max_overflow: u32,
    pub acquire_timeout: Duration,
    pub recycle: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 5,
            max_overflow: 10,
            acquire_timeout: Duration::from_secs(30),
            recycle: Duration::from_secs(3600),
        }
    }
}

impl PoolConfig {
    pub fn max_connections(&self) -> u32 {
        self.size + self.max_overflow
    }
}

/// Token signing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;

        let pool_defaults = PoolConfig::default();
        let pool = PoolConfig {
            size: parse_or(&lookup, "DB_POOL_SIZE", pool_defaults.size)?,
            max_overflow: parse_or(&lookup, "DB_MAX_OVERFLOW", pool_defaults.max_overflow)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_TIMEOUT_SECS",
                pool_defaults.acquire_timeout.as_secs(),
            )?),
            recycle: Duration::from_secs(parse_or(
                &lookup,
                "DB_POOL_RECYCLE_SECS",
                pool_defaults.recycle.as_secs(),
            )?),
        };

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            secret_key: lookup("SECRET_KEY").unwrap_or(auth_defaults.secret_key),
            algorithm: lookup("ALGORITHM").unwrap_or(auth_defaults.algorithm),
            access_token_expire_minutes: parse_or(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                auth_defaults.access_token_expire_minutes,
            )?,
        };

        if auth.secret_key == DEFAULT_SECRET_KEY {
            log::warn!("SECRET_KEY is not set, falling back to the insecure default");
        }

        Ok(Self {
            database_url,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            pool,
            auth,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", key, raw))),
        None => Ok(default),
    }
}
