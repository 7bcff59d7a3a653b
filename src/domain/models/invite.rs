use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

use crate::domain::models::participant::STATUS_PENDING;

const EXPIRY_DAYS: i64 = 30;

/// Email-addressed invitation for someone who may not have an account yet.
/// The token is the capability that lets an anonymous browser respond.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invite {
    pub id: String,
    pub event_id: String,
    pub email: String,
    pub token: String,
    pub status: String, // pending, accepted, rejected
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invite {
    pub fn new(event_id: String, email: String, created_by: String) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            email,
            token,
            status: STATUS_PENDING.to_string(),
            created_by,
            created_at: now,
            expires_at: now + Duration::days(EXPIRY_DAYS),
        }
    }
}
