//! Request repository implementation

use sqlx::PgPool;

use crate::models::request::{NewRequest, ServiceRequest};
use crate::utils::errors::OrderPilotError;

#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a completed request and return the persisted row
    pub async fn create(&self, request: NewRequest) -> Result<ServiceRequest, OrderPilotError> {
        let stored = sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO requests (user_id, username, category, details)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, username, category, details, status, created_at
            "#,
        )
        .bind(request.user_id)
        .bind(request.username)
        .bind(request.category)
        .bind(request.details)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// All requests filed by a user, newest first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<ServiceRequest>, OrderPilotError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT id, user_id, username, category, details, status, created_at \
             FROM requests WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Update a request's status
    pub async fn update_status(
        &self,
        id: i64,
        status: &str,
    ) -> Result<Option<ServiceRequest>, OrderPilotError> {
        let updated = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE requests SET status = $2 WHERE id = $1
            RETURNING id, user_id, username, category, details, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a request
    pub async fn delete(&self, id: i64) -> Result<(), OrderPilotError> {
        sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count all stored requests
    pub async fn count(&self) -> Result<i64, OrderPilotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

// These tests need a live Postgres instance; point ORDERPILOT_TEST_DATABASE_URL
// at one to run them, otherwise they pass by skipping.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection;
    use crate::models::request::PENDING_STATUS;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("ORDERPILOT_TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        connection::init_schema(&pool).await.ok()?;
        Some(pool)
    }

    fn sample_request(user_id: i64) -> NewRequest {
        NewRequest {
            user_id,
            username: Some("alice".to_string()),
            category: "Web Design".to_string(),
            details: "Need a 5-page site".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_pending() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = RequestRepository::new(pool);

        let stored = repo.create(sample_request(9001)).await.unwrap();
        assert_eq!(stored.status, PENDING_STATUS);
        assert_eq!(stored.category, "Web Design");

        repo.delete(stored.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_by_user_empty_is_ok() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = RequestRepository::new(pool);

        let requests = repo.list_by_user(-1).await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_user_newest_first() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = RequestRepository::new(pool);

        let first = repo.create(sample_request(9002)).await.unwrap();
        let second = repo.create(sample_request(9002)).await.unwrap();

        let requests = repo.list_by_user(9002).await.unwrap();
        assert_eq!(requests[0].id, second.id);
        assert_eq!(requests[1].id, first.id);

        repo.delete(first.id).await.unwrap();
        repo.delete(second.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_status() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = RequestRepository::new(pool);

        let stored = repo.create(sample_request(9003)).await.unwrap();
        let updated = repo.update_status(stored.id, "done").await.unwrap().unwrap();
        assert_eq!(updated.status, "done");

        assert!(repo.update_status(-1, "done").await.unwrap().is_none());

        repo.delete(stored.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let Some(pool) = test_pool().await else {
            return;
        };

        connection::init_schema(&pool).await.unwrap();
        connection::init_schema(&pool).await.unwrap();
    }
}
