//! Service configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenv` in `main`. Only `DATABASE_URL` and `JWT_SECRET` are
//! required; everything else has a default.

use rust_decimal::Decimal;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

// Boarding never opens more than a day before departure
const MAX_BOARDING_OFFSET_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Apply `db::SCHEMA` on startup.
    pub auto_migrate: bool,
    pub jwt_secret: String,
    /// Economy fare; other classes are multiples of it.
    pub base_fare: Decimal,
    /// How long before scheduled departure boarding starts.
    pub boarding_offset_minutes: i64,
    pub export_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                3,
            )?),
            auto_migrate: parse_or(&lookup, "AUTO_MIGRATE", false)?,
            base_fare: within(
                "BASE_FARE",
                parse_or(&lookup, "BASE_FARE", Decimal::new(1_000_000, 2))?,
                |fare| *fare > Decimal::ZERO,
            )?,
            boarding_offset_minutes: within(
                "BOARDING_OFFSET_MINUTES",
                parse_or(&lookup, "BOARDING_OFFSET_MINUTES", 40)?,
                |minutes| (0..=MAX_BOARDING_OFFSET_MINUTES).contains(minutes),
            )?,
            export_limit: within(
                "EXPORT_LIMIT",
                parse_or(&lookup, "EXPORT_LIMIT", 1000)?,
                |limit| *limit > 0,
            )?,
        })
    }
}

fn within<T, P>(key: &'static str, value: T, accept: P) -> Result<T, ConfigError>
where
    T: Display,
    P: Fn(&T) -> bool,
{
    if accept(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw })
        }
        _ => Ok(default),
    }
}
