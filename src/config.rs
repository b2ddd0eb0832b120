//! Environment-driven configuration for the storage adapters.

use thiserror::Error;

const DATABASE_URL_VAR: &str = "ATELIER_DATABASE_URL";
const POOL_SIZE_VAR: &str = "ATELIER_DB_POOL_SIZE";
const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while reading storage configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidVariable {
        /// Variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Connection settings for the `PostgreSQL` adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum r2d2 pool size.
    pub pool_size: u32,
}

impl StorageConfig {
    /// Reads configuration from the environment, honouring a `.env` file
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] when `ATELIER_DATABASE_URL`
    /// is unset, or [`ConfigError::InvalidVariable`] when
    /// `ATELIER_DB_POOL_SIZE` does not parse as a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var(DATABASE_URL_VAR)
            .map_err(|_| ConfigError::MissingVariable(DATABASE_URL_VAR))?;

        let pool_size = match std::env::var(POOL_SIZE_VAR) {
            Ok(raw) => raw.parse::<u32>().map_err(|err| ConfigError::InvalidVariable {
                name: POOL_SIZE_VAR,
                reason: err.to_string(),
            })?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        if pool_size == 0 {
            return Err(ConfigError::InvalidVariable {
                name: POOL_SIZE_VAR,
                reason: "pool size must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            pool_size,
        })
    }
}
