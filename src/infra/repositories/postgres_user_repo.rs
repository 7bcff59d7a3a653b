use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn upsert(&self, user: &User) -> Result<User, AppError> {
        // fcm_token is owned by save_fcm_token, login refreshes must not
        // clobber it
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, display_name, email, photo_url, fcm_token, last_login)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT(id) DO UPDATE SET
                 display_name = excluded.display_name,
                 email = excluded.email,
                 photo_url = excluded.photo_url,
                 last_login = excluded.last_login
             RETURNING *",
        )
            .bind(&user.id)
            .bind(&user.display_name)
            .bind(&user.email)
            .bind(&user.photo_url)
            .bind(&user.fcm_token)
            .bind(user.last_login)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn save_fcm_token(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, display_name, fcm_token, last_login)
             VALUES ($1, 'Guest', $2, $3)
             ON CONFLICT(id) DO UPDATE SET fcm_token = excluded.fcm_token",
        )
            .bind(user_id)
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<User>, AppError> {
        let pattern = format!("%{}%", query);
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE display_name ILIKE $1 OR email ILIKE $1 ORDER BY display_name ASC LIMIT $2",
        )
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
