use crate::domain::models::{
    event::Event, invite::Invite, participant::Participant,
    reminder::ReminderClaim, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>, AppError>;
    /// Events the user accepted as a participant (their non-owned agenda).
    async fn list_joined(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    async fn list_starting_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>, AppError>;
    async fn list_public_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>, AppError>;
    async fn list_all(&self, limit: i64) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Deletes the event, its participants and its reminder claims in one
    /// transaction.
    async fn delete_cascade(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn upsert(&self, participant: &Participant) -> Result<Participant, AppError>;
    async fn find(&self, event_id: &str, user_id: &str) -> Result<Option<Participant>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participant>, AppError>;
    async fn list_by_event_status(&self, event_id: &str, status: &str) -> Result<Vec<Participant>, AppError>;
    async fn list_for_user_status(&self, user_id: &str, status: &str) -> Result<Vec<Participant>, AppError>;
    async fn update_status(
        &self,
        event_id: &str,
        user_id: &str,
        status: &str,
        display_name: Option<&str>,
        responded_at: DateTime<Utc>,
    ) -> Result<Participant, AppError>;
}

#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, AppError>;
    async fn find_by_email_event(&self, email: &str, event_id: &str) -> Result<Option<Invite>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invite>, AppError>;
    async fn update_status(&self, id: &str, status: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn upsert(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn save_fcm_token(&self, user_id: &str, token: &str) -> Result<(), AppError>;
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait ReminderLogRepository: Send + Sync {
    /// Inserts the claim unless the (event, kind, offset, window) key is
    /// already taken. Returns false on collision so the caller skips the
    /// dispatch instead of duplicating it.
    async fn try_claim(&self, claim: &ReminderClaim) -> Result<bool, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<ReminderClaim>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}

#[async_trait]
pub trait PushService: Send + Sync {
    async fn send(&self, device_token: &str, title: &str, body: &str, event_id: &str, kind: &str) -> Result<(), AppError>;
}
