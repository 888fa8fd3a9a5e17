//! PostgreSQL connection pool configuration and setup
//!
//! This module handles the creation and configuration of a connection pool
//! for PostgreSQL database access.

use crate::types::{DatabaseConfig, StartupError};
pub(crate) use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

/// Creates a PostgreSQL connection pool from the loaded configuration.
///
/// Connections are opened lazily; call [`health_check`] to verify the
/// database is actually reachable.
pub fn create_pool(database: &DatabaseConfig) -> Result<Pool, StartupError> {
    let url = database
        .url
        .clone()
        .ok_or_else(|| StartupError::Config("DATABASE_URL must be set".to_string()))?;

    let mut cfg = Config::new();
    cfg.url = Some(url);
    cfg.pool = Some(PoolConfig::new(database.max_connections));
    cfg.connect_timeout = Some(database.connect_timeout);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| StartupError::Store(format!("Failed to create PostgreSQL connection pool: {e}")))
}

/// Checks if the database connection is working
pub async fn health_check(pool: &Pool) -> Result<(), String> {
    let client =
        pool.get().await.map_err(|e| format!("Failed to get database connection: {e}"))?;

    client
        .query_one("SELECT 1", &[])
        .await
        .map_err(|e| format!("Database health check failed: {e}"))?;

    Ok(())
}
