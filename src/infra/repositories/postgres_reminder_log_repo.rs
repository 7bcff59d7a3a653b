use crate::domain::{models::reminder::ReminderClaim, ports::ReminderLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresReminderLogRepo {
    pool: PgPool,
}

impl PostgresReminderLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderLogRepository for PostgresReminderLogRepo {
    async fn try_claim(&self, claim: &ReminderClaim) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO reminder_log (id, event_id, kind, offset_label, window_bucket, claimed_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT(event_id, kind, offset_label, window_bucket) DO NOTHING",
        )
            .bind(&claim.id)
            .bind(&claim.event_id)
            .bind(&claim.kind)
            .bind(&claim.offset_label)
            .bind(claim.window_bucket)
            .bind(claim.claimed_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<ReminderClaim>, AppError> {
        sqlx::query_as::<_, ReminderClaim>(
            "SELECT * FROM reminder_log WHERE event_id = $1 ORDER BY claimed_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
