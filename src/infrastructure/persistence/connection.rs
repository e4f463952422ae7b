use crate::infrastructure::config::DatabaseConfig;
use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Schema for the movie catalog, applied idempotently on connect
const SCHEMA: &str = include_str!("../../../migrations/0001_create_movies.sql");

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool and make sure the schema exists
    ///
    /// # Errors
    /// Returns an error if the database connection or schema setup fails
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let connection_url = config.connection_url();

        info!("Connecting to PostgreSQL database at {}:{}", config.host, config.port);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&connection_url)
            .await?;

        let database = Self { pool };
        database.ensure_schema().await?;

        info!("Successfully connected to PostgreSQL database");

        Ok(database)
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `movies` table if it is missing
    ///
    /// # Errors
    /// Returns an error if the DDL cannot be executed
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}
