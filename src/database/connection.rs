//! Database connection management

use std::time::Duration;

use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use crate::utils::errors::OrderPilotError;

pub type DatabasePool = Pool<Postgres>;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/orderpilot".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, OrderPilotError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Create the pool, retrying with linearly increasing backoff.
///
/// The database container often comes up after the bot; transient errors are
/// retried here at startup only, never once the bot is serving.
pub async fn create_pool_with_retry(
    config: &DatabaseConfig,
    max_retries: u32,
    backoff: Duration,
) -> Result<DatabasePool, OrderPilotError> {
    let mut attempt = 0;

    loop {
        match create_pool(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                attempt += 1;
                if attempt >= max_retries {
                    return Err(e);
                }
                warn!(
                    attempt = attempt,
                    max_retries = max_retries,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(backoff * attempt).await;
            }
        }
    }
}

/// Create the destination table if absent; safe to run on every start
pub async fn init_schema(pool: &DatabasePool) -> Result<(), OrderPilotError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS requests (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            username VARCHAR(255),
            category VARCHAR(255) NOT NULL,
            details TEXT NOT NULL,
            status VARCHAR(50) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_requests_user_id ON requests (user_id)")
        .execute(pool)
        .await?;

    info!("Database schema initialized");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), OrderPilotError> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert!(config.url.contains("postgresql://"));
    }
}
