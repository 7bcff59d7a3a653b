use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const KIND_EVENT_REMINDER: &str = "EVENT_REMINDER";
pub const KIND_INVITE_NUDGE: &str = "INVITE_NUDGE";

/// Dispatch claim for one (event, offset, window) triple. Scanners insert
/// the claim before sending; the unique key makes overlapping runs collide
/// so only one of them dispatches.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReminderClaim {
    pub id: String,
    pub event_id: String,
    pub kind: String,
    pub offset_label: String,
    pub window_bucket: i64,
    pub claimed_at: DateTime<Utc>,
}

impl ReminderClaim {
    pub fn new(event_id: String, kind: &str, offset_label: String, window_bucket: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            kind: kind.to_string(),
            offset_label,
            window_bucket,
            claimed_at: Utc::now(),
        }
    }
}
