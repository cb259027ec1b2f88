use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static JWT_SECRET: &str = "JWT_SECRET";
pub static BIND_ADDR: &str = "BIND_ADDR";
pub static PORT: &str = "PORT";
pub static DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| Error::ConfigError(format!("environment variable {} not been set", key)));
        Ok(Self {
            database_url: required(DATABASE_URL)?,
            jwt_secret: required(JWT_SECRET)?,
            bind_addr: lookup(BIND_ADDR).unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(PORT, lookup(PORT), 8000)?,
            max_connections: parse_or(DB_MAX_CONNECTIONS, lookup(DB_MAX_CONNECTIONS), 5)?,
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e| Error::ConfigError(format!("invalid {} value {:?}: {}", key, v, e))),
    }
}
