use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::QueryHistoryRecord;

/// Per-user query history
///
/// Listings are newest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a query for `user_id`
    async fn save(&self, user_id: &str, query: &str) -> Result<QueryHistoryRecord>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QueryHistoryRecord>>;

    async fn list_all(&self) -> Result<Vec<QueryHistoryRecord>>;

    /// Delete every record owned by `user_id`, returning how many went
    async fn clear_for_user(&self, user_id: &str) -> Result<u64>;

    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<()>;
}

/// History store on PostgreSQL, schema from `migrations/`
#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running history store migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn save(&self, user_id: &str, query: &str) -> Result<QueryHistoryRecord> {
        if user_id.is_empty() {
            return Err(AppError::InvalidInput(
                "History records need a user".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, QueryHistoryRecord>(
            "INSERT INTO query_history (user_id, query) VALUES ($1, $2) \
             RETURNING id, user_id, query, created_at",
        )
        .bind(user_id)
        .bind(query)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QueryHistoryRecord>> {
        let records = sqlx::query_as::<_, QueryHistoryRecord>(
            "SELECT id, user_id, query, created_at FROM query_history \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<QueryHistoryRecord>> {
        let records = sqlx::query_as::<_, QueryHistoryRecord>(
            "SELECT id, user_id, query, created_at FROM query_history \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn clear_for_user(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM query_history WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
