//! Database connection management
//!
//! Pool configuration and the Postgres-backed [`crate::SqlStore`].

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{mask_database_url, ServerConfig, DEFAULT_POOL_SIZE};

mod pg_store;

pub use pg_store::{row_to_json, PgStore};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_POOL_SIZE,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)), // 10 minutes
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
        }
    }

    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            max_connections: config.pool_size,
            ..Self::new(config.database_url.clone())
        }
    }

    /// Create the connection pool
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        info!(
            "Connecting to database: {}",
            mask_database_url(&self.database_url)
        );

        let mut pool_options = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connection_timeout);

        if let Some(idle_timeout) = self.idle_timeout {
            pool_options = pool_options.idle_timeout(idle_timeout);
        }

        if let Some(max_lifetime) = self.max_lifetime {
            pool_options = pool_options.max_lifetime(max_lifetime);
        }

        let pool = pool_options
            .connect(&self.database_url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");
        Ok(pool)
    }
}
