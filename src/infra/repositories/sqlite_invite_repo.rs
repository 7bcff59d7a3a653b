use crate::domain::{models::invite::Invite, ports::InviteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteInviteRepo {
    pool: SqlitePool,
}

impl SqliteInviteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for SqliteInviteRepo {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError> {
        sqlx::query_as::<_, Invite>(
            "INSERT INTO invites (id, event_id, email, token, status, created_by, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&invite.id)
            .bind(&invite.event_id)
            .bind(&invite.email)
            .bind(&invite.token)
            .bind(&invite.status)
            .bind(&invite.created_by)
            .bind(invite.created_at)
            .bind(invite.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email_event(&self, email: &str, event_id: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE email = ? AND event_id = ? ORDER BY created_at DESC LIMIT 1",
        )
            .bind(email)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE event_id = ? ORDER BY created_at DESC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE invites SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invite not found".into()));
        }
        Ok(())
    }
}
