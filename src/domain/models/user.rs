use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Snapshot of the external identity provider's view of a user,
/// refreshed on login.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub fcm_token: Option<String>,
    pub last_login: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, display_name: String, email: Option<String>, photo_url: Option<String>) -> Self {
        Self {
            id,
            display_name,
            email,
            photo_url,
            fcm_token: None,
            last_login: Utc::now(),
        }
    }
}
