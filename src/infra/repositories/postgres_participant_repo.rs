use crate::domain::{models::participant::Participant, ports::ParticipantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresParticipantRepo {
    pool: PgPool,
}

impl PostgresParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepo {
    async fn upsert(&self, participant: &Participant) -> Result<Participant, AppError> {
        sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (event_id, user_id, role, display_name, status, invited_at, responded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT(event_id, user_id) DO UPDATE SET
                 role = excluded.role,
                 display_name = excluded.display_name,
                 status = excluded.status,
                 invited_at = excluded.invited_at,
                 responded_at = excluded.responded_at
             RETURNING *",
        )
            .bind(&participant.event_id)
            .bind(&participant.user_id)
            .bind(&participant.role)
            .bind(&participant.display_name)
            .bind(&participant.status)
            .bind(participant.invited_at)
            .bind(participant.responded_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, event_id: &str, user_id: &str) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = $1 AND user_id = $2",
        )
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = $1 ORDER BY invited_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event_status(&self, event_id: &str, status: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = $1 AND status = $2 ORDER BY invited_at ASC",
        )
            .bind(event_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user_status(&self, user_id: &str, status: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE user_id = $1 AND status = $2 ORDER BY invited_at DESC",
        )
            .bind(user_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(
        &self,
        event_id: &str,
        user_id: &str,
        status: &str,
        display_name: Option<&str>,
        responded_at: DateTime<Utc>,
    ) -> Result<Participant, AppError> {
        sqlx::query_as::<_, Participant>(
            "UPDATE participants
             SET status = $1, display_name = COALESCE($2, display_name), responded_at = $3
             WHERE event_id = $4 AND user_id = $5
             RETURNING *",
        )
            .bind(status)
            .bind(display_name)
            .bind(responded_at)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Participant not found".into()))
    }
}
