//! Configuration module
//!
//! Loads configuration from environment variables.

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_HISTORY_CAPACITY;

/// Signing secret used outside production when JWT_SECRET is unset
const DEVELOPMENT_JWT_SECRET: &str = "development-only-secret-change-me";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Redis connection URL for the recent-activity cache
    pub redis_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HS256 signing secret
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub jwt_expiration_secs: i64,

    /// Entries kept per account in the recent-activity cache
    pub history_capacity: usize,

    /// Smallest balance an account may be opened with
    pub min_initial_balance: Decimal,

    /// Upper bound on the post-commit cache write
    pub cache_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10)?;

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_or("PORT", 3000)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_production(&environment) => return Err(ConfigError::MissingEnv("JWT_SECRET")),
            _ => DEVELOPMENT_JWT_SECRET.to_string(),
        };

        let jwt_expiration_secs: i64 = parse_or("JWT_EXPIRATION_SECS", 3600)?;
        if jwt_expiration_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRATION_SECS"));
        }

        let history_capacity: usize = parse_or("HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?;
        if history_capacity == 0 {
            return Err(ConfigError::InvalidValue("HISTORY_CAPACITY"));
        }

        let min_initial_balance: Decimal = parse_or("MIN_INITIAL_BALANCE", Decimal::ONE)?;

        let cache_timeout = Duration::from_millis(parse_or("CACHE_TIMEOUT_MS", 500)?);

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            host,
            port,
            environment,
            jwt_secret,
            jwt_expiration_secs,
            history_capacity,
            min_initial_balance,
            cache_timeout,
        })
    }
}

fn is_production(environment: &str) -> bool {
    environment.eq_ignore_ascii_case("production")
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_max_connections", &self.database_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("history_capacity", &self.history_capacity)
            .field("min_initial_balance", &self.min_initial_balance)
            .field("cache_timeout", &self.cache_timeout)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        let value: u32 = parse_or("CQRS_BANKING_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_or_invalid() {
        env::set_var("CQRS_BANKING_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16, _> = parse_or("CQRS_BANKING_TEST_BAD_PORT", 3000);
        assert!(matches!(result, Err(ConfigError::InvalidValue("CQRS_BANKING_TEST_BAD_PORT"))));
    }

    #[test]
    fn test_parse_or_decimal() {
        env::set_var("CQRS_BANKING_TEST_MIN_BALANCE", "2.50");
        let value: Decimal = parse_or("CQRS_BANKING_TEST_MIN_BALANCE", Decimal::ONE).unwrap();
        assert_eq!(value, Decimal::new(250, 2));
    }

    #[test]
    fn test_is_production() {
        assert!(is_production("production"));
        assert!(is_production("PRODUCTION"));
        assert!(!is_production("development"));
    }
}
