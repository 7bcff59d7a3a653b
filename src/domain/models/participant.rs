use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_GUEST: &str = "guest";

/// One user's relationship to one event. Keyed by (event_id, user_id);
/// rows live and die with their parent event.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Participant {
    pub event_id: String,
    pub user_id: String,
    pub role: String,
    pub display_name: String,
    pub status: String,
    pub invited_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(event_id: String, user_id: String, role: String, display_name: String) -> Self {
        Self {
            event_id,
            user_id,
            role,
            display_name,
            status: STATUS_PENDING.to_string(),
            invited_at: Utc::now(),
            responded_at: None,
        }
    }
}

/// Responses may only move a pending invite to accepted or rejected.
pub fn validate_response_status(status: &str) -> Result<(), AppError> {
    match status {
        STATUS_ACCEPTED | STATUS_REJECTED => Ok(()),
        other => Err(AppError::InvalidStatus(format!(
            "Status must be 'accepted' or 'rejected', got '{}'", other
        ))),
    }
}
