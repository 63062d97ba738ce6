use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::constants::MAX_CONNECT_RETRY_INTERVAL_MS;
use crate::error::{HttpCheckError, Result};

/// Owns the process-wide PostgreSQL pool.
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Single connection attempt using the configured pool limits.
    pub async fn new(config: &ServiceConfig) -> Result<Self> {
        if config.database_url.trim().is_empty() {
            return Err(HttpCheckError::Configuration(
                "DATABASE_DSN environment variable is not set".to_string(),
            ));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Connect, retrying up to `connect_max_retries` times. The wait starts
    /// at `connect_retry_interval` and doubles after each failed attempt, up
    /// to [`MAX_CONNECT_RETRY_INTERVAL_MS`]. The last failure is returned as
    /// `StoreUnavailable`, including a missing connection string.
    pub async fn connect_with_retry(config: &ServiceConfig) -> Result<Self> {
        let max_retries = config.connect_max_retries.max(1);
        let max_interval = Duration::from_millis(MAX_CONNECT_RETRY_INTERVAL_MS);
        let mut retry_interval = config.connect_retry_interval().min(max_interval);
        let mut last_error = None;

        for attempt in 1..=max_retries {
            match Self::new(config).await {
                Ok(connection) => {
                    info!(attempt, max_retries, "Connected to the database");
                    return Ok(connection);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_retries,
                        retry_in_ms = retry_interval.as_millis() as u64,
                        error = %e,
                        "Failed to connect to the database"
                    );
                    last_error = Some(e);
                    if attempt < max_retries {
                        tokio::time::sleep(retry_interval).await;
                        retry_interval = (retry_interval * 2).min(max_interval);
                    }
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no connection attempt was made".to_string());
        Err(HttpCheckError::StoreUnavailable(format!(
            "failed to connect to the database after {max_retries} attempts: {reason}"
        )))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| HttpCheckError::Database(format!("migration failed: {e}")))?;

        info!("Database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
