//! `PostgreSQL` connection pool shared by the database adapters.

use crate::config::StorageConfig;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use thiserror::Error;

/// Connection pool type used by every `PostgreSQL` adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Error raised while initialising the connection pool.
#[derive(Debug, Clone, Error)]
#[error("failed to initialise connection pool: {0}")]
pub struct PoolInitError(Arc<dyn std::error::Error + Send + Sync>);

/// Builds a connection pool from storage configuration.
///
/// # Errors
///
/// Returns [`PoolInitError`] when the pool cannot be initialised.
pub fn build_pool(config: &StorageConfig) -> Result<PgPool, PoolInitError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(|err| PoolInitError(Arc::new(err)))
}
