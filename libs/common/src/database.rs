//! Database module for handling PostgreSQL connections and operations
//!
//! This module provides connection pooling, configuration, migrations and
//! health checks for the PostgreSQL databases used by the services.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions};
use std::{env, time::Duration};
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from the `DATABASE_*` environment variables
    pub fn from_env() -> DatabaseResult<Self> {
        Self::from_env_prefixed("DATABASE")
    }

    /// Create a new DatabaseConfig from `{prefix}_*` environment variables
    ///
    /// # Environment Variables
    /// - `{prefix}_URL`: PostgreSQL connection URL (required)
    /// - `{prefix}_MAX_CONNECTIONS`: Maximum number of connections (default: 10)
    /// - `{prefix}_MIN_CONNECTIONS`: Minimum number of connections (default: 1)
    /// - `{prefix}_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 30)
    pub fn from_env_prefixed(prefix: &str) -> DatabaseResult<Self> {
        let url_var = format!("{prefix}_URL");
        let database_url = env::var(&url_var).map_err(|_| {
            DatabaseError::Configuration(format!("{url_var} environment variable not set"))
        })?;

        let max_connections = env::var(format!("{prefix}_MAX_CONNECTIONS"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let min_connections = env::var(format!("{prefix}_MIN_CONNECTIONS"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let connection_timeout = env::var(format!("{prefix}_CONNECTION_TIMEOUT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            max_connections,
            min_connections,
            connection_timeout,
        })
    }
}

/// Initialize a PostgreSQL connection pool
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<PgPool>` - PostgreSQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    info!("Initializing database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&config.database_url)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool, migrator: &Migrator) -> DatabaseResult<()> {
    migrator
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Database migrations applied");
    Ok(())
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - PostgreSQL connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the database answered, false otherwise
pub async fn health_check(pool: &PgPool) -> DatabaseResult<bool> {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Ok(true),
        Err(e) => {
            error!("Database health check failed: {}", e);
            Ok(false)
        }
    }
}
