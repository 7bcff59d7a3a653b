use std::sync::Arc;
use chrono::Utc;
use tracing::info;

use crate::domain::models::participant::{
    validate_response_status, Participant, STATUS_PENDING,
};
use crate::domain::ports::{ParticipantRepository, UserRepository};
use crate::error::AppError;

const FALLBACK_NAME: &str = "Guest";

/// Owns the pending/accepted/rejected machine. All three response entry
/// points funnel through `respond`, so they cannot diverge.
pub struct ParticipantService {
    participants: Arc<dyn ParticipantRepository>,
    users: Arc<dyn UserRepository>,
}

impl ParticipantService {
    pub fn new(participants: Arc<dyn ParticipantRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { participants, users }
    }

    /// Upserts a pending participant, snapshotting the current display name.
    /// A participant who already answered keeps that answer unless the
    /// caller explicitly asks for a reset; a still-pending one just gets a
    /// fresh invited_at.
    pub async fn invite(
        &self,
        event_id: &str,
        user_id: &str,
        role: &str,
        force_reset: bool,
    ) -> Result<Participant, AppError> {
        if let Some(existing) = self.participants.find(event_id, user_id).await? {
            if existing.status != STATUS_PENDING && !force_reset {
                info!("User {} already responded to event {}, keeping status {}", user_id, event_id, existing.status);
                return Ok(existing);
            }
        }

        let display_name = self
            .users
            .find_by_id(user_id)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let participant = Participant::new(
            event_id.to_string(),
            user_id.to_string(),
            role.to_string(),
            display_name,
        );
        self.participants.upsert(&participant).await
    }

    /// The single state transition behind every response handler. Repeating
    /// the same answer is a no-op; an unknown participant is a 404.
    pub async fn respond(
        &self,
        event_id: &str,
        user_id: &str,
        status: &str,
        display_name: Option<&str>,
    ) -> Result<Participant, AppError> {
        validate_response_status(status)?;

        let existing = self
            .participants
            .find(event_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Participant not found".into()))?;

        if existing.status == status {
            return Ok(existing);
        }

        self.participants
            .update_status(event_id, user_id, status, display_name, Utc::now())
            .await
    }

    /// Participants of an event, with the users-table display name filled in
    /// where the stored snapshot is missing.
    pub async fn list(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        let mut participants = self.participants.list_by_event(event_id).await?;

        for p in participants.iter_mut() {
            if p.display_name.is_empty() || p.display_name == FALLBACK_NAME {
                if let Some(user) = self.users.find_by_id(&p.user_id).await? {
                    p.display_name = user.display_name;
                }
            }
        }

        Ok(participants)
    }
}
